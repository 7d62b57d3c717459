//! Compact parse-tree literals for tests.
//!
//! `tree(r#"(query (segment (attr "base=Haus")))"#)` builds the same
//! `ParseTree` a parser adapter would, without dragging a real parser
//! into the test. Each node is `(category "text"? child*)`; the text is
//! optional and quoted.

use crate::tree::{ParseId, ParseTree, TreeBuilder};

pub fn tree(src: &str) -> ParseTree {
    let mut parser = SexpParser {
        src: src.as_bytes(),
        pos: 0,
        builder: TreeBuilder::new(),
    };
    parser.skip_ws();
    let root = parser.node();
    parser.skip_ws();
    assert_eq!(parser.pos, parser.src.len(), "trailing input in tree literal");
    parser.builder.build(root)
}

struct SexpParser<'a> {
    src: &'a [u8],
    pos: usize,
    builder: TreeBuilder,
}

impl SexpParser<'_> {
    fn node(&mut self) -> ParseId {
        self.expect(b'(');
        self.skip_ws();
        let category = self.symbol();
        self.skip_ws();

        let text = if self.peek() == Some(b'"') {
            let t = self.string();
            self.skip_ws();
            t
        } else {
            String::new()
        };

        let mut children = Vec::new();
        while self.peek() == Some(b'(') {
            children.push(self.node());
            self.skip_ws();
        }
        self.expect(b')');

        if children.is_empty() {
            self.builder.leaf(category, text)
        } else if text.is_empty() {
            self.builder.node(category, children)
        } else {
            self.builder.node_with_text(category, text, children)
        }
    }

    fn symbol(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || c == b'(' || c == b')' || c == b'"' {
                break;
            }
            self.pos += 1;
        }
        assert!(self.pos > start, "expected a category label at {}", start);
        String::from_utf8(self.src[start..self.pos].to_vec()).unwrap()
    }

    fn string(&mut self) -> String {
        self.expect(b'"');
        let mut out = Vec::new();
        loop {
            match self.bump() {
                Some(b'"') => break,
                Some(b'\\') => {
                    let escaped = self.bump().expect("dangling escape in tree literal");
                    out.push(escaped);
                }
                Some(c) => out.push(c),
                None => panic!("unterminated string in tree literal"),
            }
        }
        String::from_utf8(out).unwrap()
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn expect(&mut self, c: u8) {
        assert_eq!(
            self.bump(),
            Some(c),
            "expected {:?} at {}",
            c as char,
            self.pos
        );
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::tree;

    #[test]
    fn nested_literal() {
        let t = tree(r#"(query (segment (attr "pos=NN")) (segment))"#);
        let root = t.root().unwrap();
        assert_eq!(t.category(root), "query");
        assert_eq!(t.child_count(root), 2);

        let seg = t.child(root, 0).unwrap();
        let attr = t.child(seg, 0).unwrap();
        assert_eq!(t.text(attr), "pos=NN");
    }

    #[test]
    fn escaped_quote_in_text() {
        let t = tree(r#"(word "say \"hi\"")"#);
        assert_eq!(t.text(t.root().unwrap()), r#"say "hi""#);
    }
}
