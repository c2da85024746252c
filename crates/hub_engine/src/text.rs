use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;

/// Approximates `innerText`: block elements start new lines, runs of
/// whitespace collapse, and non-rendered elements are skipped.
pub(crate) fn inner_text(element: ElementRef) -> String {
    let mut ctx = TextContext::default();
    for child in element.children() {
        visit_node(child, &mut ctx);
    }
    ctx.finish()
}

fn visit_node(node: NodeRef<'_, Node>, ctx: &mut TextContext) {
    match node.value() {
        Node::Text(text) => ctx.append_text(text),
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                visit_element(element, ctx);
            }
        }
        _ => {
            for child in node.children() {
                visit_node(child, ctx);
            }
        }
    }
}

fn visit_element(element: ElementRef, ctx: &mut TextContext) {
    let tag = element.value().name().to_ascii_lowercase();
    match tag.as_str() {
        "script" | "style" | "noscript" | "template" | "button" | "mat-icon" => {}
        "br" => ctx.ensure_newline(),
        "li" => {
            ctx.ensure_newline();
            ctx.append_text("- ");
            visit_children(element, ctx);
            ctx.ensure_newline();
        }
        "p" | "div" | "section" | "article" | "header" | "footer" | "pre" | "blockquote" | "ul"
        | "ol" | "table" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            ctx.ensure_newline();
            visit_children(element, ctx);
            ctx.ensure_newline();
        }
        _ => visit_children(element, ctx),
    }
}

fn visit_children(element: ElementRef, ctx: &mut TextContext) {
    for child in element.children() {
        visit_node(child, ctx);
    }
}

#[derive(Default)]
struct TextContext {
    builder: String,
    last_char: Option<char>,
}

impl TextContext {
    fn finish(self) -> String {
        self.builder
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if self.last_char.is_none()
                    || self.last_char == Some(' ')
                    || self.last_char == Some('\n')
                {
                    continue;
                }
                self.push_char(' ');
            } else {
                self.push_char(ch);
            }
        }
    }

    fn ensure_newline(&mut self) {
        if self.last_char == Some('\n') || self.builder.is_empty() {
            return;
        }
        self.push_char('\n');
    }

    fn push_char(&mut self, ch: char) {
        self.builder.push(ch);
        self.last_char = Some(ch);
    }
}
