//! Renders a loaded [`Grammar`] back out as Rust source that
//! reconstructs it via `ebnfc_core::grammar`'s own constructors: a
//! self-contained module that, once compiled in, needs nothing but
//! `ebnfc-core` to parse with the embedded grammar.

use ebnfc_core::grammar::{Alternative, Grammar, Item, Leaf, Modifier, Rule};

pub fn generate(grammar: &Grammar, start_rule: &str) -> String {
    let mut out = String::new();
    out.push_str("// Generated by ebnfc-gen. Do not edit by hand.\n");
    out.push_str("use ebnfc_core::grammar::{Alternative, Grammar, Item, Leaf, Rule};\n\n");
    out.push_str("pub fn grammar() -> Grammar {\n");
    out.push_str("    Grammar::new(vec![\n");
    for rule in grammar.rules() {
        out.push_str(&render_rule(rule));
    }
    out.push_str("    ])\n");
    out.push_str("}\n\n");
    out.push_str(&format!("pub const START_RULE: &str = {start_rule:?};\n"));
    out
}

fn render_rule(rule: &Rule) -> String {
    let mut out = format!("        Rule::new({:?}, vec![\n", rule.name);
    for alt in &rule.alternatives {
        out.push_str(&render_alternative(alt));
    }
    out.push_str("        ]),\n");
    out
}

fn render_alternative(alt: &Alternative) -> String {
    let mut out = String::from("            Alternative::new(vec![\n");
    for item in &alt.items {
        out.push_str(&render_item(item));
    }
    out.push_str("            ]),\n");
    out
}

fn render_item(item: &Item) -> String {
    let ctor = match item.modifier {
        Modifier::Required => "required",
        Modifier::Optional => "optional",
        Modifier::RepeatZeroOrMore => "repeat",
    };
    let leaves: Vec<String> = item.leaves.iter().map(render_leaf).collect();
    format!(
        "                Item::{ctor}(vec![{}]),\n",
        leaves.join(", ")
    )
}

fn render_leaf(leaf: &Leaf) -> String {
    match leaf {
        Leaf::Terminal(name) => format!("Leaf::Terminal({name:?}.into())"),
        Leaf::Literal(lexeme) => format!("Leaf::Literal({lexeme:?}.into())"),
        Leaf::Nonterminal(name) => format!("Leaf::Nonterminal({name:?}.into())"),
    }
}
