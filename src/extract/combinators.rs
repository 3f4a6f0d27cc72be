//! Generic building blocks: array coercion, object destructuring, keyed
//! maps, and named-call matching.
//!
//! Both object combinators share one property-enumeration pass that handles
//! static keys, computed keys (resolved through the string/template grammar),
//! shorthand properties, method shorthand, and spread elements referencing an
//! object literal declared elsewhere, imports included (one reference hop;
//! spreads nested inside the spliced object are not followed). Each property
//! remembers the context its value lives in, so spliced values parse against
//! the right file's text.

use rustc_hash::FxHashMap;
use tree_sitter::Node;

use super::references::{member_path_value, resolve_declarator, resolvable};
use super::scalars::{string_or_template, TextValue};
use super::{unwrap_wrappers, union, ExtractCtx, Extractor};

/// Array literal where every element parses through `item`. Elements that
/// fail to parse are silently skipped; an empty array literal yields
/// `Some(vec![])`, never `None`.
pub fn array_of<'t, T: 't>(item: Extractor<'t, T>) -> Extractor<'t, Vec<T>> {
    Extractor::new(
        |node, _| unwrap_wrappers(node).kind() == "array",
        move |node, ctx| {
            let node = unwrap_wrappers(node);
            let mut results = Vec::new();
            let mut cursor = node.walk();
            for element in node.named_children(&mut cursor) {
                if let Some(result) = item.parse(element, ctx) {
                    results.push(result);
                }
            }
            Some(results)
        },
    )
}

/// Single-or-array coercion: an array literal parses every element, any
/// other matching node wraps its single result in a one-element vec.
///
/// A nested array literal splices its elements flat (one level, like JS
/// `.flat()`), so `entry: [shared, "extra"]` written with `shared` expanded
/// inline keeps a flat action list.
pub fn maybe_array_of<'t, T: 't>(item: Extractor<'t, T>) -> Extractor<'t, Vec<T>> {
    let list = Extractor::new(
        |node, _: &ExtractCtx<'t>| unwrap_wrappers(node).kind() == "array",
        {
            let item = item.clone();
            move |node, ctx: &ExtractCtx<'t>| {
                let node = unwrap_wrappers(node);
                let mut results = Vec::new();
                let mut cursor = node.walk();
                for element in node.named_children(&mut cursor) {
                    if unwrap_wrappers(element).kind() == "array" {
                        if let Some(mut nested) = array_of(item.clone()).parse(element, ctx) {
                            results.append(&mut nested);
                        }
                        continue;
                    }
                    if let Some(result) = item.parse(element, ctx) {
                        results.push(result);
                    }
                }
                Some(results)
            }
        },
    );
    let single = item.map(|result, _| vec![result]);
    union(vec![list, single])
}

/// One enumerated property of an object literal.
#[derive(Clone)]
pub struct ObjectProp<'t> {
    pub key: String,
    pub key_node: Node<'t>,
    pub value: Node<'t>,
    /// Context the value must be parsed with. Differs from the caller's when
    /// the property was spliced from a spread resolved into an imported
    /// module, where the value node's byte range belongs to that module's
    /// text.
    pub ctx: ExtractCtx<'t>,
}

/// Enumerate an object literal's properties in declaration order.
///
/// Duplicate keys keep the first position with the last value (JS override
/// semantics), so downstream maps never see the same key twice.
pub fn object_properties<'t>(node: Node<'t>, ctx: &ExtractCtx<'t>) -> Vec<ObjectProp<'t>> {
    let mut props: Vec<ObjectProp<'t>> = Vec::new();
    let mut index_by_key: FxHashMap<String, usize> = FxHashMap::default();

    collect_properties(node, ctx, true, &mut |prop| {
        match index_by_key.get(&prop.key) {
            Some(&at) => props[at] = prop,
            None => {
                index_by_key.insert(prop.key.clone(), props.len());
                props.push(prop);
            }
        }
    });

    props
}

fn collect_properties<'t>(
    node: Node<'t>,
    ctx: &ExtractCtx<'t>,
    follow_spreads: bool,
    push: &mut impl FnMut(ObjectProp<'t>),
) {
    if node.kind() != "object" {
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "pair" => {
                let Some(key_node) = child.child_by_field_name("key") else {
                    continue;
                };
                let Some(value) = child.child_by_field_name("value") else {
                    continue;
                };
                if let Some(key) = property_key(key_node, ctx) {
                    push(ObjectProp {
                        key,
                        key_node,
                        value,
                        ctx: ctx.clone(),
                    });
                }
            }
            "shorthand_property_identifier" => {
                // `{ foo }`: the identifier is both key and value; the
                // value side stays resolvable downstream.
                push(ObjectProp {
                    key: ctx.text(child).to_string(),
                    key_node: child,
                    value: child,
                    ctx: ctx.clone(),
                });
            }
            "method_definition" => {
                if let Some(name) = child.child_by_field_name("name") {
                    push(ObjectProp {
                        key: ctx.text(name).to_string(),
                        key_node: name,
                        value: child,
                        ctx: ctx.clone(),
                    });
                }
            }
            "spread_element" if follow_spreads => {
                if let Some((object, spread_ctx)) = resolve_spread_argument(child, ctx) {
                    collect_properties(object, &spread_ctx, false, push);
                }
            }
            _ => {}
        }
    }
}

/// Static value of a property key node: identifier text, string/number
/// literal value, or a resolved computed key. Unresolvable computed keys
/// yield `None`, which skips the property.
fn property_key<'t>(key_node: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<String> {
    match key_node.kind() {
        "property_identifier" | "private_property_identifier" => {
            Some(ctx.text(key_node).to_string())
        }
        "string" => ctx.file.string_value(key_node),
        "number" => Some(ctx.text(key_node).to_string()),
        "computed_property_name" => {
            let inner = key_node.named_child(0)?;
            resolvable(string_or_template())
                .parse(inner, ctx)
                .map(|text: TextValue| text.value)
        }
        _ => None,
    }
}

/// Resolve a spread element's argument to an object literal: inline
/// literals pass through, identifiers and dotted paths are chased one hop
/// through the file's declarators.
fn resolve_spread_argument<'t>(
    spread: Node<'t>,
    ctx: &ExtractCtx<'t>,
) -> Option<(Node<'t>, ExtractCtx<'t>)> {
    let argument = unwrap_wrappers(spread.named_child(0)?);
    match argument.kind() {
        "object" => Some((argument, ctx.clone())),
        "identifier" => {
            let (value, target_ctx) = resolve_declarator(ctx.text(argument), ctx)?;
            let value = unwrap_wrappers(value);
            (value.kind() == "object").then_some((value, target_ctx))
        }
        "member_expression" => {
            let (value, target_ctx) = member_path_value(argument, ctx)?;
            let value = unwrap_wrappers(value);
            (value.kind() == "object").then_some((value, target_ctx))
        }
        _ => None,
    }
}

/// Destructure an object literal with a known key set.
///
/// `build` makes the empty record for the matched object node; `assign`
/// fills one recognized slot per enumerated property and ignores keys it
/// does not know (forward compatibility: new config keys never hard-fail a
/// parse). Value extractors are constructed inside `assign` at parse time,
/// which is what keeps the grammar's recursion (states within states)
/// well-founded.
///
/// Accepts identifier / member-path references to object literals declared
/// elsewhere, and unwraps `as`/`satisfies`/parenthesized wrappers first.
pub fn object_with_known_keys<'t, R: 't>(
    build: impl Fn(Node<'t>) -> R + 't,
    assign: impl Fn(&mut R, &ObjectProp<'t>, &ExtractCtx<'t>) + 't,
) -> Extractor<'t, R> {
    resolvable(Extractor::new(
        |node, _| unwrap_wrappers(node).kind() == "object",
        move |node, ctx| {
            let node = unwrap_wrappers(node);
            let mut record = build(node);
            for prop in object_properties(node, ctx) {
                assign(&mut record, &prop, &prop.ctx);
            }
            Some(record)
        },
    ))
}

/// A parsed unknown-keys map: every statically-keyed property whose value
/// parsed, in declaration order.
#[derive(Debug, Clone)]
pub struct ObjectOf<'t, T> {
    pub node: Node<'t>,
    pub entries: Vec<ObjectEntry<'t, T>>,
}

/// One entry of an [`ObjectOf`] map, carrying its key node for location
/// reporting.
#[derive(Debug, Clone)]
pub struct ObjectEntry<'t, T> {
    pub key: String,
    pub key_node: Node<'t>,
    pub value: T,
}

impl<'t, T> ObjectOf<'t, T> {
    pub fn get(&self, key: &str) -> Option<&ObjectEntry<'t, T>> {
        self.entries.iter().find(|entry| entry.key == key)
    }
}

/// Map every key of an object literal through one extractor (`states`,
/// `on`, `after`, options maps). Entries whose value fails to parse are
/// dropped; key order is preserved.
pub fn object_of<'t, T: 't>(value: Extractor<'t, T>) -> Extractor<'t, ObjectOf<'t, T>> {
    resolvable(Extractor::new(
        |node, _| unwrap_wrappers(node).kind() == "object",
        move |node, ctx| {
            let node = unwrap_wrappers(node);
            let mut entries = Vec::new();
            for prop in object_properties(node, ctx) {
                if let Some(parsed) = value.parse(prop.value, &prop.ctx) {
                    entries.push(ObjectEntry {
                        key: prop.key,
                        key_node: prop.key_node,
                        value: parsed,
                    });
                }
            }
            Some(ObjectOf { node, entries })
        },
    ))
}

/// A matched `name(...)` call with its extracted positional arguments.
/// Missing or unparseable arguments leave `None` slots, never an error.
#[derive(Debug, Clone)]
pub struct CallResult<'t, A, B = ()> {
    pub node: Node<'t>,
    pub first: Option<A>,
    pub second: Option<B>,
}

/// Name of a call expression's callee: a bare identifier, or the final
/// property of a member access (`actions.assign(...)`).
pub fn callee_name<'t>(call: Node<'t>, ctx: &ExtractCtx<'t>) -> Option<&'t str> {
    let callee = unwrap_wrappers(call.child_by_field_name("function")?);
    match callee.kind() {
        "identifier" => Some(ctx.text(callee)),
        "member_expression" => {
            let property = callee.child_by_field_name("property")?;
            (property.kind() == "property_identifier").then(|| ctx.text(property))
        }
        _ => None,
    }
}

/// Positional arguments of a call expression. Template-tag call forms have
/// no argument list and yield an empty vec.
pub fn call_arguments<'t>(call: Node<'t>) -> Vec<Node<'t>> {
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    if arguments.kind() != "arguments" {
        return Vec::new();
    }
    let mut cursor = arguments.walk();
    arguments.named_children(&mut cursor).collect()
}

/// Recognize a call expression whose callee is exactly `name` and extract
/// its first argument.
pub fn named_call<'t, A: 't>(
    name: &'static str,
    first: Extractor<'t, A>,
) -> Extractor<'t, CallResult<'t, A>> {
    Extractor::new(
        move |node, ctx| {
            let node = unwrap_wrappers(node);
            node.kind() == "call_expression" && callee_name(node, ctx) == Some(name)
        },
        move |node, ctx| {
            let node = unwrap_wrappers(node);
            let args = call_arguments(node);
            Some(CallResult {
                node,
                first: args.first().and_then(|&arg| first.parse(arg, ctx)),
                second: None,
            })
        },
    )
}

/// Two-argument variant of [`named_call`].
pub fn named_call2<'t, A: 't, B: 't>(
    name: &'static str,
    first: Extractor<'t, A>,
    second: Extractor<'t, B>,
) -> Extractor<'t, CallResult<'t, A, B>> {
    Extractor::new(
        move |node, ctx| {
            let node = unwrap_wrappers(node);
            node.kind() == "call_expression" && callee_name(node, ctx) == Some(name)
        },
        move |node, ctx| {
            let node = unwrap_wrappers(node);
            let args = call_arguments(node);
            Some(CallResult {
                node,
                first: args.first().and_then(|&arg| first.parse(arg, ctx)),
                second: args.get(1).and_then(|&arg| second.parse(arg, ctx)),
            })
        },
    )
}
