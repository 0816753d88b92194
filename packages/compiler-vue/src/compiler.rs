use pagecraft_model::{Node, NodeKind, Slot, StyleValue, Tree};
use serde_json::Value;
use std::collections::BTreeMap;

/// Every generated element carries `{CLASS_PREFIX}-{kind}` ahead of the
/// node's own class so tooling can look elements up independently of user
/// edits.
const CLASS_PREFIX: &str = "pb";

/// Tag emitted for each slot of a composite-slot container.
const SLOT_TAG: &str = "ui-tab-pane";

/// Property keys emitted as inner text rather than attributes.
const TEXT_KEYS: [&str; 2] = ["text", "content"];

const INDENT: &str = "  ";

struct Context {
    buffer: String,
    depth: usize,
}

impl Context {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            depth: 0,
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.add(INDENT);
        }
        self.add(text);
        self.add("\n");
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn into_output(self) -> String {
        self.buffer
    }
}

/// Generate the component document for `tree`, embedding `name` as the
/// component identifier. Pure and deterministic: the same tree and name
/// always yield byte-identical output.
pub fn generate(tree: &Tree, name: &str) -> String {
    let mut ctx = Context::new();

    ctx.add_line("<template>");
    ctx.indent();
    for root in &tree.roots {
        generate_node(root, false, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</template>");

    ctx.add("\n");
    ctx.add_line("<script>");
    ctx.add_line("export default {");
    ctx.indent();
    ctx.add_line(&format!("name: \"{}\"", escape_html(name)));
    ctx.dedent();
    ctx.add_line("}");
    ctx.add_line("</script>");

    ctx.add("\n");
    ctx.add_line("<style scoped>");
    ctx.add_line("</style>");

    ctx.into_output().trim().to_string()
}

fn generate_node(node: &Node, grow: bool, ctx: &mut Context) {
    let tag = tag_for(node);

    let mut open = format!("<{} class=\"{}\"", tag, class_attr(node));
    for (key, value) in &node.properties {
        if is_reserved_key(node, key) {
            continue;
        }
        push_attribute(&mut open, key, value);
    }
    if let Some(style) = style_attr(&effective_style(node, grow)) {
        open.push_str(&format!(" style=\"{}\"", style));
    }

    let text = text_content(node);

    // Composite-slot containers render their slots, never plain children.
    if node.kind.has_slots() {
        if node.items.is_empty() {
            ctx.add_line(&format!("{}></{}>", open, tag));
            return;
        }
        ctx.add_line(&format!("{}>", open));
        ctx.indent();
        for slot in &node.items {
            generate_slot(slot, ctx);
        }
        ctx.dedent();
        ctx.add_line(&format!("</{}>", tag));
        return;
    }

    if node.children.is_empty() {
        match text {
            None if is_self_closing(&tag) => ctx.add_line(&format!("{} />", open)),
            None => ctx.add_line(&format!("{}></{}>", open, tag)),
            Some(text) => ctx.add_line(&format!("{}>{}</{}>", open, text, tag)),
        }
        return;
    }

    // Auto-fill propagates a grow style to direct children only.
    let children_grow = has_auto_fill(node);

    ctx.add_line(&format!("{}>", open));
    ctx.indent();
    if let Some(text) = text {
        ctx.add_line(&text);
    }
    for child in &node.children {
        generate_node(child, children_grow, ctx);
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", tag));
}

fn generate_slot(slot: &Slot, ctx: &mut Context) {
    let mut open = format!(
        "<{} name=\"{}\" label=\"{}\"",
        SLOT_TAG,
        escape_html(&slot.slot_key),
        escape_html(&slot.label)
    );
    if slot.disabled {
        open.push_str(" disabled");
    }
    if slot.closable {
        open.push_str(" closable");
    }

    if slot.children.is_empty() {
        ctx.add_line(&format!("{}></{}>", open, SLOT_TAG));
        return;
    }

    ctx.add_line(&format!("{}>", open));
    ctx.indent();
    for child in &slot.children {
        generate_node(child, false, ctx);
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", SLOT_TAG));
}

/// Map a node to its output tag. Heading and list are parametric; library
/// kinds get the `ui-` namespace; malformed custom names fall back to a
/// plain container tag.
fn tag_for(node: &Node) -> String {
    match &node.kind {
        NodeKind::Container => "div".to_string(),
        NodeKind::Text => "p".to_string(),
        NodeKind::Button => "button".to_string(),
        NodeKind::Link => "a".to_string(),
        NodeKind::Image => "img".to_string(),
        NodeKind::Divider => "hr".to_string(),
        NodeKind::Heading => heading_tag(node),
        NodeKind::List => list_tag(node),
        NodeKind::Form => "form".to_string(),
        NodeKind::Input => "input".to_string(),
        NodeKind::Textarea => "textarea".to_string(),
        NodeKind::Tabs => "ui-tabs".to_string(),
        NodeKind::Library(name) => format!("ui-{}", name),
        NodeKind::Custom(name) => {
            if is_valid_tag_name(name) {
                name.clone()
            } else {
                "div".to_string()
            }
        }
    }
}

fn heading_tag(node: &Node) -> String {
    let level = node
        .properties
        .get("level")
        .and_then(Value::as_f64)
        .map(|level| level as i64)
        .unwrap_or(1)
        .clamp(1, 6);
    format!("h{}", level)
}

fn list_tag(node: &Node) -> String {
    let ordered = node
        .properties
        .get("ordered")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if ordered { "ol" } else { "ul" }.to_string()
}

fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

fn class_attr(node: &Node) -> String {
    let derived = format!("{}-{}", CLASS_PREFIX, node.kind.name());
    match &node.class_name {
        Some(extra) if !extra.is_empty() => format!("{} {}", derived, escape_html(extra)),
        _ => derived,
    }
}

/// Keys consumed by structural or per-kind special cases, excluded from the
/// generic attribute pass.
fn is_reserved_key(node: &Node, key: &str) -> bool {
    if TEXT_KEYS.contains(&key) {
        return true;
    }
    match &node.kind {
        NodeKind::Heading => key == "level",
        NodeKind::List => key == "ordered",
        NodeKind::Container => {
            matches!(key, "autoFill" | "direction" | "justify" | "align" | "gap")
        }
        _ => false,
    }
}

fn push_attribute(open: &mut String, key: &str, value: &Value) {
    match value {
        Value::Bool(true) => {
            open.push(' ');
            open.push_str(key);
        }
        Value::Bool(false) => {}
        Value::String(text) => {
            open.push_str(&format!(" {}=\"{}\"", key, escape_html(text)));
        }
        other => {
            // Bound attribute: single quotes keep the JSON literal intact.
            let literal = other.to_string().replace('\'', "&#39;");
            open.push_str(&format!(" :{}='{}'", key, literal));
        }
    }
}

fn text_content(node: &Node) -> Option<String> {
    let value = TEXT_KEYS
        .iter()
        .find_map(|key| node.properties.get(*key))?;
    match value {
        Value::String(text) => Some(escape_html(text)),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn has_auto_fill(node: &Node) -> bool {
    node.kind.supports_auto_fill()
        && node
            .properties
            .get("autoFill")
            .and_then(Value::as_bool)
            .unwrap_or(false)
}

/// The style map actually rendered: the node's own style, plus the
/// `flex-grow` a parent's auto-fill hands down, plus the flex layout an
/// auto-fill container derives from its own axis/alignment/gap properties.
fn effective_style(node: &Node, grow: bool) -> BTreeMap<String, StyleValue> {
    let mut style = node.style.clone();

    if grow && !style.contains_key("flexGrow") {
        style.insert("flexGrow".to_string(), StyleValue::Number(1.0));
    }

    if has_auto_fill(node) {
        style.insert("display".to_string(), StyleValue::Text("flex".to_string()));

        let direction = node
            .properties
            .get("direction")
            .and_then(Value::as_str)
            .unwrap_or("row");
        style.insert(
            "flexDirection".to_string(),
            StyleValue::Text(direction.to_string()),
        );

        if let Some(justify) = node.properties.get("justify").and_then(Value::as_str) {
            style.insert(
                "justifyContent".to_string(),
                StyleValue::Text(justify.to_string()),
            );
        }
        if let Some(align) = node.properties.get("align").and_then(Value::as_str) {
            style.insert("alignItems".to_string(), StyleValue::Text(align.to_string()));
        }
        match node.properties.get("gap") {
            Some(Value::Number(gap)) => {
                if let Some(gap) = gap.as_f64() {
                    style.insert("gap".to_string(), StyleValue::Number(gap));
                }
            }
            Some(Value::String(gap)) => {
                style.insert("gap".to_string(), StyleValue::Text(gap.clone()));
            }
            _ => {}
        }
    }

    style
}

fn style_attr(style: &BTreeMap<String, StyleValue>) -> Option<String> {
    if style.is_empty() {
        return None;
    }
    let pairs: Vec<String> = style
        .iter()
        .map(|(key, value)| format!("{}: {};", hyphenate(key), css_value(value)))
        .collect();
    Some(pairs.join(" "))
}

/// `marginTop` → `margin-top`
fn hyphenate(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn css_value(value: &StyleValue) -> String {
    match value {
        StyleValue::Number(number) => format!("{}px", format_number(*number)),
        StyleValue::Text(text) => text.clone(),
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
