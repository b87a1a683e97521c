//! Seeded random tree generation for property tests.

use hadron_amlgen::builder;
use hadron_amlgen::{DataNode, Node, ObjectFlags, ObjectNode, RootNode, TableHeader, opcode};
use rand::Rng;
use rand::rngs::StdRng;

use crate::common::{Term, Value};

const NAME_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ_0123456789";

fn name_seg(rng: &mut StdRng) -> String {
    (0..4)
        .map(|i| {
            // Digits are not allowed in the lead position.
            let pool = if i == 0 { &NAME_CHARS[..27] } else { NAME_CHARS };
            char::from(pool[rng.random_range(0..pool.len())])
        })
        .collect()
}

/// Random opaque bytes. Occasionally large, so that enclosing package
/// lengths cross into the 2- and 3-byte encodings.
fn blob(rng: &mut StdRng) -> Vec<u8> {
    let len = match rng.random_range(0..10) {
        0 => rng.random_range(0x0F00..0x1100),
        1..=3 => rng.random_range(0x30..0x50),
        _ => rng.random_range(0..16),
    };
    (0..len).map(|_| rng.random()).collect()
}

// ---------------------------------------------------------------------------
// Opaque trees: arbitrary structure, payload bytes are not valid AML
// ---------------------------------------------------------------------------

fn opaque_object(rng: &mut StdRng, depth: u32) -> ObjectNode {
    let mut object = match rng.random_range(0..6) {
        0 => ObjectNode::new(opcode::SCOPE_OP),
        1 => ObjectNode::new(opcode::NAME_OP),
        2 => ObjectNode::extended(opcode::ext::DEVICE_OP),
        3 => ObjectNode::extended(opcode::ext::MUTEX_OP),
        4 => ObjectNode::pseudo(),
        _ => ObjectNode::pseudo().into_method_invocation(),
    };
    for _ in 0..rng.random_range(0..3) {
        object = object.fixed(opaque_node(rng, depth + 1));
    }
    for _ in 0..rng.random_range(0..4) {
        object = object.variable(opaque_node(rng, depth + 1));
    }
    object
}

fn opaque_node(rng: &mut StdRng, depth: u32) -> Node {
    if depth >= 5 || rng.random_bool(0.4) {
        Node::Data(DataNode::new(blob(rng)))
    } else {
        Node::Object(opaque_object(rng, depth))
    }
}

/// Builds a random definition block of opaque terms.
pub fn opaque_tree(rng: &mut StdRng) -> Node {
    let body = (0..rng.random_range(0..6)).map(|_| opaque_node(rng, 0)).collect();
    Node::Root(RootNode::new(TableHeader::new(*b"SSDT", 2), body))
}

/// Counts the encoded objects in `node` that carry a package length.
pub fn count_pkg_lengths(node: &Node) -> usize {
    match node {
        Node::Root(root) => root.children().iter().map(count_pkg_lengths).sum(),
        Node::Data(_) => 0,
        Node::Object(object) => {
            let own = usize::from(
                !object.flags().contains(ObjectFlags::PSEUDO) && object.has_pkg_length(),
            );
            own + object.encoded_args().map(count_pkg_lengths).sum::<usize>()
        }
    }
}

// ---------------------------------------------------------------------------
// Decodable trees: a term model plus the equivalent node tree
// ---------------------------------------------------------------------------

fn random_value(rng: &mut StdRng, depth: u32) -> Value {
    match rng.random_range(0..if depth < 2 { 5 } else { 4 }) {
        0 => Value::Integer(match rng.random_range(0..3) {
            0 => rng.random_range(0..3),
            1 => u64::MAX,
            _ => rng.random(),
        }),
        1 => Value::Integer(u64::from(rng.random::<u16>())),
        2 => {
            let len = rng.random_range(0..24);
            Value::String(
                (0..len)
                    .map(|_| char::from(rng.random_range(b' '..=b'~')))
                    .collect(),
            )
        }
        3 => Value::Buffer(blob(rng)),
        _ => Value::Package(
            (0..rng.random_range(0..6))
                .map(|_| random_value(rng, depth + 1))
                .collect(),
        ),
    }
}

fn random_term(rng: &mut StdRng, depth: u32) -> Term {
    let choice = if depth >= 3 { rng.random_range(2..4) } else { rng.random_range(0..4) };
    match choice {
        0 => Term::Scope {
            name: name_seg(rng),
            body: random_terms(rng, depth + 1),
        },
        1 => Term::Device {
            name: name_seg(rng),
            body: random_terms(rng, depth + 1),
        },
        2 => Term::Name {
            name: name_seg(rng),
            value: random_value(rng, 0),
        },
        _ => Term::Method {
            name: name_seg(rng),
            flags: rng.random(),
            body: blob(rng),
        },
    }
}

fn random_terms(rng: &mut StdRng, depth: u32) -> Vec<Term> {
    (0..rng.random_range(0..5)).map(|_| random_term(rng, depth)).collect()
}

fn value_node(value: &Value) -> Node {
    match value {
        Value::Integer(v) => builder::integer(*v),
        Value::String(s) => builder::string(s).unwrap(),
        Value::Buffer(bytes) => builder::buffer(bytes),
        Value::Package(elements) => {
            builder::package(elements.iter().map(value_node).collect()).unwrap()
        }
    }
}

/// Builds the node tree that should encode `term`.
pub fn term_node(term: &Term) -> Node {
    match term {
        Term::Scope { name, body } => {
            builder::scope(name, body.iter().map(term_node).collect()).unwrap()
        }
        Term::Device { name, body } => {
            builder::device(name, body.iter().map(term_node).collect()).unwrap()
        }
        Term::Name { name, value } => builder::name(name, value_node(value)).unwrap(),
        Term::Method { name, flags, body } => builder::method(
            name,
            flags & 0x07,
            flags & 0x08 != 0,
            flags >> 4,
            vec![Node::Data(DataNode::from_slice(body))],
        )
        .unwrap(),
    }
}

/// Builds a random decodable definition block and the terms it should
/// decode to.
pub fn decodable_tree(rng: &mut StdRng) -> (Node, Vec<Term>) {
    let terms = random_terms(rng, 0);
    let body = terms.iter().map(term_node).collect();
    let tree = Node::Root(RootNode::new(
        TableHeader::new(*b"SSDT", 2).with_oem(*b"HADRON", *b"AMLGENPT", 1),
        body,
    ));
    (tree, terms)
}
