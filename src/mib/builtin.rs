//! Bundled definitions for the most commonly polled objects.

use super::{MibTree, NamingTree};
use crate::types::TypeTag;

struct Def {
    module: &'static str,
    label: &'static str,
    parent: &'static str,
    subid: u32,
    syntax: Option<TypeTag>,
}

const fn node(module: &'static str, label: &'static str, parent: &'static str, subid: u32) -> Def {
    Def {
        module,
        label,
        parent,
        subid,
        syntax: None,
    }
}

const fn obj(
    module: &'static str,
    label: &'static str,
    parent: &'static str,
    subid: u32,
    syntax: TypeTag,
) -> Def {
    Def {
        module,
        label,
        parent,
        subid,
        syntax: Some(syntax),
    }
}

const SMI: &str = "SNMPv2-SMI";
const SNMPV2: &str = "SNMPv2-MIB";
const IF: &str = "IF-MIB";
const IP: &str = "IP-MIB";

// Parents always precede their children.
const DEFS: &[Def] = &[
    node(SMI, "org", "iso", 3),
    node(SMI, "dod", "org", 6),
    node(SMI, "internet", "dod", 1),
    node(SMI, "directory", "internet", 1),
    node(SMI, "mgmt", "internet", 2),
    node(SMI, "mib-2", "mgmt", 1),
    node(SMI, "experimental", "internet", 3),
    node(SMI, "private", "internet", 4),
    node(SMI, "enterprises", "private", 1),
    node(SMI, "snmpV2", "internet", 6),
    node(SMI, "snmpModules", "snmpV2", 3),
    // system group
    node(SNMPV2, "system", "mib-2", 1),
    obj(SNMPV2, "sysDescr", "system", 1, TypeTag::OctetStr),
    obj(SNMPV2, "sysObjectID", "system", 2, TypeTag::ObjectId),
    obj(SNMPV2, "sysUpTime", "system", 3, TypeTag::TimeTicks),
    obj(SNMPV2, "sysContact", "system", 4, TypeTag::OctetStr),
    obj(SNMPV2, "sysName", "system", 5, TypeTag::OctetStr),
    obj(SNMPV2, "sysLocation", "system", 6, TypeTag::OctetStr),
    obj(SNMPV2, "sysServices", "system", 7, TypeTag::Integer),
    obj(SNMPV2, "sysORLastChange", "system", 8, TypeTag::TimeTicks),
    node(SNMPV2, "sysORTable", "system", 9),
    node(SNMPV2, "sysOREntry", "sysORTable", 1),
    obj(SNMPV2, "sysORIndex", "sysOREntry", 1, TypeTag::Integer),
    obj(SNMPV2, "sysORID", "sysOREntry", 2, TypeTag::ObjectId),
    obj(SNMPV2, "sysORDescr", "sysOREntry", 3, TypeTag::OctetStr),
    obj(SNMPV2, "sysORUpTime", "sysOREntry", 4, TypeTag::TimeTicks),
    // interfaces group
    node(IF, "interfaces", "mib-2", 2),
    obj(IF, "ifNumber", "interfaces", 1, TypeTag::Integer),
    node(IF, "ifTable", "interfaces", 2),
    node(IF, "ifEntry", "ifTable", 1),
    obj(IF, "ifIndex", "ifEntry", 1, TypeTag::Integer),
    obj(IF, "ifDescr", "ifEntry", 2, TypeTag::OctetStr),
    obj(IF, "ifType", "ifEntry", 3, TypeTag::Integer),
    obj(IF, "ifMtu", "ifEntry", 4, TypeTag::Integer),
    obj(IF, "ifSpeed", "ifEntry", 5, TypeTag::Gauge),
    obj(IF, "ifPhysAddress", "ifEntry", 6, TypeTag::OctetStr),
    obj(IF, "ifAdminStatus", "ifEntry", 7, TypeTag::Integer),
    obj(IF, "ifOperStatus", "ifEntry", 8, TypeTag::Integer),
    obj(IF, "ifLastChange", "ifEntry", 9, TypeTag::TimeTicks),
    obj(IF, "ifInOctets", "ifEntry", 10, TypeTag::Counter),
    obj(IF, "ifInUcastPkts", "ifEntry", 11, TypeTag::Counter),
    obj(IF, "ifInDiscards", "ifEntry", 13, TypeTag::Counter),
    obj(IF, "ifInErrors", "ifEntry", 14, TypeTag::Counter),
    obj(IF, "ifOutOctets", "ifEntry", 16, TypeTag::Counter),
    obj(IF, "ifOutUcastPkts", "ifEntry", 17, TypeTag::Counter),
    obj(IF, "ifOutDiscards", "ifEntry", 19, TypeTag::Counter),
    obj(IF, "ifOutErrors", "ifEntry", 20, TypeTag::Counter),
    // ip group
    node(IP, "ip", "mib-2", 4),
    obj(IP, "ipForwarding", "ip", 1, TypeTag::Integer),
    obj(IP, "ipDefaultTTL", "ip", 2, TypeTag::Integer),
    node(IP, "ipAddrTable", "ip", 20),
    node(IP, "ipAddrEntry", "ipAddrTable", 1),
    obj(IP, "ipAdEntAddr", "ipAddrEntry", 1, TypeTag::IpAddr),
    obj(IP, "ipAdEntIfIndex", "ipAddrEntry", 2, TypeTag::Integer),
    obj(IP, "ipAdEntNetMask", "ipAddrEntry", 3, TypeTag::IpAddr),
    // snmp group
    node(SNMPV2, "snmp", "mib-2", 11),
    obj(SNMPV2, "snmpInPkts", "snmp", 1, TypeTag::Counter),
    obj(SNMPV2, "snmpOutPkts", "snmp", 2, TypeTag::Counter),
    obj(SNMPV2, "snmpEnableAuthenTraps", "snmp", 30, TypeTag::Integer),
    // ifXTable
    node(IF, "ifMIB", "mib-2", 31),
    node(IF, "ifMIBObjects", "ifMIB", 1),
    node(IF, "ifXTable", "ifMIBObjects", 1),
    node(IF, "ifXEntry", "ifXTable", 1),
    obj(IF, "ifName", "ifXEntry", 1, TypeTag::OctetStr),
    obj(IF, "ifHCInOctets", "ifXEntry", 6, TypeTag::Counter64),
    obj(IF, "ifHCOutOctets", "ifXEntry", 10, TypeTag::Counter64),
    obj(IF, "ifHighSpeed", "ifXEntry", 15, TypeTag::Gauge),
    obj(IF, "ifAlias", "ifXEntry", 18, TypeTag::OctetStr),
    // notifications
    node(SNMPV2, "snmpMIB", "snmpModules", 1),
    node(SNMPV2, "snmpMIBObjects", "snmpMIB", 1),
    node(SNMPV2, "snmpTrap", "snmpMIBObjects", 4),
    obj(SNMPV2, "snmpTrapOID", "snmpTrap", 1, TypeTag::ObjectId),
    node(SNMPV2, "snmpTraps", "snmpMIBObjects", 5),
    obj(SNMPV2, "coldStart", "snmpTraps", 1, TypeTag::Notification),
    obj(SNMPV2, "warmStart", "snmpTraps", 2, TypeTag::Notification),
    obj(IF, "linkDown", "snmpTraps", 3, TypeTag::Notification),
    obj(IF, "linkUp", "snmpTraps", 4, TypeTag::Notification),
];

const IF_STATUS: &[(i32, &str)] = &[(1, "up"), (2, "down"), (3, "testing")];

const ENUMS: &[(&str, &[(i32, &str)])] = &[
    ("ifAdminStatus", IF_STATUS),
    (
        "ifOperStatus",
        &[
            (1, "up"),
            (2, "down"),
            (3, "testing"),
            (4, "unknown"),
            (5, "dormant"),
            (6, "notPresent"),
            (7, "lowerLayerDown"),
        ],
    ),
    (
        "ifType",
        &[
            (1, "other"),
            (6, "ethernetCsmacd"),
            (24, "softwareLoopback"),
            (53, "propVirtual"),
            (131, "tunnel"),
            (161, "ieee8023adLag"),
        ],
    ),
    ("ipForwarding", &[(1, "forwarding"), (2, "notForwarding")]),
    ("snmpEnableAuthenTraps", &[(1, "enabled"), (2, "disabled")]),
];

impl MibTree {
    /// Tree preloaded with the SNMPv2-SMI skeleton and the system,
    /// interfaces, ip, snmp and ifXTable objects.
    ///
    /// ```
    /// use snmpq::mib::{MibTree, NamingTree};
    /// use snmpq::oid;
    ///
    /// let tree = MibTree::standard();
    /// let id = tree.find_leaf_by_name("ifOperStatus").unwrap();
    /// assert_eq!(tree.oid_of(id), oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 8));
    /// assert_eq!(tree.node(id).unwrap().enum_label(7), Some("lowerLayerDown"));
    /// ```
    pub fn standard() -> Self {
        let mut tree = MibTree::new();
        for def in DEFS {
            let defined = match def.syntax {
                Some(syntax) => {
                    tree.define_object(def.module, def.label, def.parent, def.subid, syntax)
                }
                None => tree.define(def.module, def.label, def.parent, def.subid),
            };
            if let Err(e) = defined {
                tracing::warn!(target: "snmpq::mib", { snmp.label = def.label, error = %e }, "skipping bundled definition");
            }
        }
        for (label, enums) in ENUMS {
            if let Some(id) = tree.find_leaf_by_name(label) {
                tree.set_enums(id, enums);
            }
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn every_definition_loads() {
        let tree = MibTree::standard();
        // three roots plus the table
        assert_eq!(tree.len(), 3 + DEFS.len());
        for def in DEFS {
            assert!(tree.find_leaf_by_name(def.label).is_some(), "{}", def.label);
        }
    }

    #[test]
    fn well_known_paths() {
        let tree = MibTree::standard();
        let at = |name: &str| tree.oid_of(tree.find_leaf_by_name(name).unwrap());
        assert_eq!(at("sysDescr"), oid!(1, 3, 6, 1, 2, 1, 1, 1));
        assert_eq!(at("ifHCInOctets"), oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6));
        assert_eq!(at("enterprises"), oid!(1, 3, 6, 1, 4, 1));
        assert_eq!(at("coldStart"), oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1));
    }

    #[test]
    fn syntaxes_and_modules() {
        let tree = MibTree::standard();
        let ifspeed = tree.find_leaf_by_name("ifSpeed").unwrap();
        assert_eq!(tree.node(ifspeed).unwrap().syntax, Some(TypeTag::Gauge));
        assert_eq!(tree.node(ifspeed).unwrap().module.as_deref(), Some("IF-MIB"));
        let system = tree.find_leaf_by_name("system").unwrap();
        assert_eq!(tree.node(system).unwrap().syntax, None);
    }
}
