//! Integration tests: multi-module loading, linking and formatting.

use mibtree_core::hint::HintField;
use mibtree_core::{IndexValue, LoadError, LoadState, MemorySource, Mib, OutBuf, Value};
use proptest::prelude::*;

const MY_MIB: &str = r#"
MY-MIB DEFINITIONS ::= BEGIN
IMPORTS OBJECT-TYPE, enterprises FROM SNMPv2-SMI;

myGroup OBJECT IDENTIFIER ::= { enterprises 12345 2 }

myObj OBJECT-TYPE
    SYNTAX INTEGER { up(1), down(2) }
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "State."
    ::= { myGroup 5 }
END
"#;

fn mgmt_module(name: &str) -> String {
    format!(
        "{name} DEFINITIONS ::= BEGIN\n\
         IMPORTS internet FROM SNMPv2-SMI;\n\
         mgmt OBJECT IDENTIFIER ::= {{ internet 4 }}\n\
         END\n"
    )
}

/// Node labelled `label` sitting at `oid`.
fn node_at(mib: &Mib, oid: &[u32], label: &str) -> Option<mibtree_core::NodeId> {
    mib.tree()
        .node_at(oid)
        .filter(|&id| mib.node(id).is_some_and(|n| n.label == label))
}

/// Number of children of `parent` at sub-identifier `subid`.
fn subid_count(mib: &Mib, parent: mibtree_core::NodeId, subid: u32) -> usize {
    mib.children(parent)
        .iter()
        .filter(|&&c| mib.node(c).is_some_and(|n| n.subid == subid))
        .count()
}

/// Test name resolution and enum rendering for a freshly loaded module.
#[test]
fn test_resolve_and_format_enum() {
    let mut mib = Mib::new();
    mib.load_text("MY-MIB", MY_MIB.as_bytes()).unwrap();

    let oid = mib.resolve_name("myObj").unwrap();
    assert_eq!(oid.arcs(), &[1, 3, 6, 1, 4, 1, 12345, 2, 5]);

    let node = mib.find_node("myObj").unwrap();
    let mut buf = OutBuf::growable();
    mib.format_node_value(node, &Value::Integer(2), &mut buf)
        .unwrap();
    assert_eq!(buf.as_str(), "down(2)");

    mib.settings_mut().quick_print = true;
    let mut buf = OutBuf::growable();
    mib.format_node_value(node, &Value::Integer(2), &mut buf)
        .unwrap();
    assert_eq!(buf.as_str(), "down");
}

/// Two modules defining the same label at the same position share one node.
#[test]
fn test_shared_definition_then_unload() {
    let mut mib = Mib::new();
    let old = mib
        .load_text("OLD-MIB", mgmt_module("OLD-MIB").as_bytes())
        .unwrap();
    let new = mib
        .load_text("NEW-MIB", mgmt_module("NEW-MIB").as_bytes())
        .unwrap();

    let internet = [1, 3, 6, 1];
    let at_four: Vec<_> = mib
        .children(mib.tree().node_at(&internet).unwrap())
        .iter()
        .filter(|&&id| mib.node(id).is_some_and(|n| n.label == "mgmt" && n.subid == 4))
        .copied()
        .collect();
    assert_eq!(at_four.len(), 1);
    let shared = mib.node(at_four[0]).unwrap();
    assert!(shared.is_claimed_by(old));
    assert!(shared.is_claimed_by(new));

    mib.unload_module("NEW-MIB").unwrap();
    assert_eq!(mib.module_state("NEW-MIB"), Some(LoadState::NotLoaded));
    let id = mib.find_node_in_module("mgmt", "OLD-MIB").unwrap();
    let node = mib.node(id).unwrap();
    assert!(node.is_claimed_by(old));
    assert!(!node.is_claimed_by(new));

    mib.unload_module("OLD-MIB").unwrap();
    assert!(mib.find_node_in_module("mgmt", "OLD-MIB").is_none());
    assert!(mib
        .children(mib.tree().node_at(&internet).unwrap())
        .iter()
        .all(|&id| mib.node(id).is_some_and(|n| !(n.label == "mgmt" && n.subid == 4))));
    // SNMPv2-SMI still owns its own nodes.
    assert!(node_at(&mib, &[1, 3, 6, 1, 2], "mgmt").is_some());
}

/// A node whose parent module arrives later is adopted when it does.
#[test]
fn test_orphan_adopted_after_prerequisite_loads() {
    let child = r#"
CHILD-MIB DEFINITIONS ::= BEGIN
IMPORTS parentNode FROM PARENT-MIB;
childNode OBJECT IDENTIFIER ::= { parentNode 3 }
END
"#;
    let parent = r#"
PARENT-MIB DEFINITIONS ::= BEGIN
IMPORTS enterprises FROM SNMPv2-SMI;
parentNode OBJECT IDENTIFIER ::= { enterprises 99 }
END
"#;
    let mut mib = Mib::new();
    mib.load_text("CHILD-MIB", child.as_bytes()).unwrap();
    let orphans = mib.orphans();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].label, "childNode");
    assert_eq!(orphans[0].parent, "parentNode");
    assert!(mib.find_node("childNode").is_none());

    mib.load_text("PARENT-MIB", parent.as_bytes()).unwrap();
    assert_eq!(mib.adopt_orphans(), 0);
    assert!(mib.orphans().is_empty());
    assert_eq!(
        mib.resolve_name("childNode").unwrap().to_dotted(),
        "1.3.6.1.4.1.99.3"
    );
}

/// Anonymous intermediate arcs merge with a named node in either load order.
#[test]
fn test_anonymous_arc_merge() {
    let named = r#"
NAMED-MIB DEFINITIONS ::= BEGIN
IMPORTS enterprises FROM SNMPv2-SMI;
acme OBJECT IDENTIFIER ::= { enterprises 4242 }
END
"#;
    let deep = r#"
DEEP-MIB DEFINITIONS ::= BEGIN
IMPORTS enterprises FROM SNMPv2-SMI;
widget OBJECT IDENTIFIER ::= { enterprises 4242 1 }
END
"#;
    for order in [[named, deep], [deep, named]] {
        let mut mib = Mib::new();
        for (i, text) in order.iter().enumerate() {
            mib.load_text(&format!("file{i}"), text.as_bytes()).unwrap();
        }
        let acme = mib.find_node("acme").unwrap();
        let widget = mib.find_node("widget").unwrap();
        assert_eq!(mib.parent(widget), Some(acme));
        assert_eq!(subid_count(&mib, mib.parent(acme).unwrap(), 4242), 1);
        assert_eq!(
            mib.resolve_name("widget").unwrap().to_dotted(),
            "1.3.6.1.4.1.4242.1"
        );
    }
}

/// Two modules that each introduce the same unlabeled arc share one subtree.
#[test]
fn test_shared_anonymous_arc_merges() {
    let first = r#"
WIDGET-ONE-MIB DEFINITIONS ::= BEGIN
IMPORTS enterprises FROM SNMPv2-SMI;
w1 OBJECT IDENTIFIER ::= { enterprises 4242 1 }
END
"#;
    let second = r#"
WIDGET-TWO-MIB DEFINITIONS ::= BEGIN
IMPORTS enterprises FROM SNMPv2-SMI;
w2 OBJECT IDENTIFIER ::= { enterprises 4242 2 }
END
"#;
    for order in [[first, second], [second, first]] {
        let mut mib = Mib::new();
        for (i, text) in order.iter().enumerate() {
            mib.load_text(&format!("file{i}"), text.as_bytes()).unwrap();
        }
        let w1 = mib.find_node("w1").unwrap();
        let w2 = mib.find_node("w2").unwrap();
        let arc = mib.parent(w1).unwrap();
        assert_eq!(mib.parent(w2), Some(arc));

        let enterprises = mib.find_node("enterprises").unwrap();
        assert_eq!(mib.parent(arc), Some(enterprises));
        assert_eq!(subid_count(&mib, enterprises, 4242), 1);
        assert_eq!(
            mib.resolve_name("w2").unwrap().to_dotted(),
            "1.3.6.1.4.1.4242.2"
        );
    }
}

const PAIR_MIB: &str = r#"
PAIR-MIB DEFINITIONS ::= BEGIN
IMPORTS OBJECT-TYPE, enterprises FROM SNMPv2-SMI
    TEXTUAL-CONVENTION FROM SNMPv2-TC;

PairId ::= TEXTUAL-CONVENTION
    DISPLAY-HINT "1d1d"
    STATUS current
    DESCRIPTION "Two numbers."
    SYNTAX OCTET STRING (SIZE(2))

PairEntry ::= SEQUENCE { pairId PairId, pairName OCTET STRING }

pairTable OBJECT-TYPE
    SYNTAX SEQUENCE OF PairEntry
    MAX-ACCESS not-accessible
    STATUS current
    DESCRIPTION "Pairs."
    ::= { enterprises 5151 }

pairEntry OBJECT-TYPE
    SYNTAX PairEntry
    MAX-ACCESS not-accessible
    STATUS current
    DESCRIPTION "Pair."
    INDEX { pairId }
    ::= { pairTable 1 }

pairId OBJECT-TYPE
    SYNTAX PairId
    MAX-ACCESS not-accessible
    STATUS current
    DESCRIPTION "Key."
    ::= { pairEntry 1 }

pairName OBJECT-TYPE
    SYNTAX OCTET STRING
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "Name."
    ::= { pairEntry 2 }
END
"#;

fn pair_mib() -> Mib {
    let mut mib = Mib::new();
    mib.load_text("PAIR-MIB", PAIR_MIB.as_bytes()).unwrap();
    mib
}

/// A fixed-size hinted index splits into one field per hint spec.
#[test]
fn test_fixed_size_hinted_index() {
    let mib = pair_mib();
    let row = mib.find_node("pairEntry").unwrap();
    let parts = mib.decompose_index(row, &[5, 7]).unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].value, IndexValue::Octets(vec![5, 7]));
    assert_eq!(
        parts[0].fields(),
        vec![HintField::Number(5), HintField::Number(7)]
    );
    assert!(mib.decompose_index(row, &[5]).is_err());
    assert_eq!(
        mib.compose_index(row, &[IndexValue::Octets(vec![5, 7])])
            .unwrap(),
        vec![5, 7]
    );
}

/// Reading a loaded module again and re-initialising change nothing.
#[test]
fn test_reload_is_idempotent() {
    let source = MemorySource::new().with("my.mib", MY_MIB);
    let mut mib = Mib::with_source(source);
    let first = mib.read_module("MY-MIB").unwrap();
    let nodes = mib.tree().len();
    let second = mib.read_module("MY-MIB").unwrap();
    assert_eq!(first, second);
    assert_eq!(mib.tree().len(), nodes);

    mib.shutdown();
    mib.init();
    mib.init();
    assert_eq!(mib.module_state("MY-MIB"), None);
    mib.read_module("MY-MIB").unwrap();
    assert_eq!(mib.tree().len(), nodes);
}

#[test]
fn test_unknown_module_reported() {
    let mut mib = Mib::new();
    assert_eq!(
        mib.read_module("NO-SUCH-MIB"),
        Err(LoadError::ModuleNotFound {
            name: "NO-SUCH-MIB".into()
        })
    );
}

/// Rendering a resolved name and resolving the rendering agree.
#[test]
fn test_render_resolves_back() {
    let mib = pair_mib();
    let oid = mib.resolve_name("pairName.5.7").unwrap();
    let text = mib.render_oid(&oid);
    assert_eq!(text, "PAIR-MIB::pairName.5.7");
    assert_eq!(mib.resolve_name(&text).unwrap(), oid);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pair_index_round_trips(a in any::<u8>(), b in any::<u8>()) {
        let mib = pair_mib();
        let row = mib.find_node("pairEntry").unwrap();
        let value = IndexValue::Octets(vec![a, b]);
        let subids = mib.compose_index(row, std::slice::from_ref(&value)).unwrap();
        let parts = mib.decompose_index(row, &subids).unwrap();
        prop_assert_eq!(&parts[0].value, &value);
    }

    #[test]
    fn prop_octet_hint_round_trips(bytes in proptest::collection::vec(any::<u8>(), 1..16)) {
        let hint = mibtree_core::OctetHint::parse("1x:").unwrap();
        let text = hint.format(&bytes);
        prop_assert_eq!(hint.encode(&text).unwrap(), bytes);
    }

    #[test]
    fn prop_integer_hint_round_trips(value in -1_000_000i64..1_000_000, places in 0u8..6) {
        let hint = mibtree_core::IntegerHint::Decimal { places };
        let text = hint.format(value);
        prop_assert_eq!(hint.parse_value(&text), Some(value));
    }
}
