//! extract/scanner.rs
//!
//! Locates xUnit test methods in C# source text.

use std::sync::OnceLock;

use regex::Regex;

pub const UNKNOWN_CLASS: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBlock<'a> {
    pub name: &'a str,
    pub attributes: &'a str,
    pub body: &'a str,
}

impl MethodBlock<'_> {
    /// Number of `[InlineData]` rows, with a plain `[Fact]` counting as one.
    pub fn case_count(&self) -> usize {
        self.attributes.matches("[InlineData").count().max(1)
    }
}

/* ============================================================
   Public API
   ============================================================ */

pub fn class_name(source: &str) -> String {
    class_regex()
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_CLASS.to_string())
}

/// Every `[Fact]`/`[Theory]` method in declaration order.
pub fn method_blocks(source: &str) -> Vec<MethodBlock<'_>> {
    let mut blocks = Vec::new();

    for caps in header_regex().captures_iter(source) {
        let (Some(header), Some(attrs), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        let body_start = header.end();
        let body_end = matching_brace(source, body_start).unwrap_or(source.len());

        blocks.push(MethodBlock {
            name: name.as_str(),
            attributes: attrs.as_str(),
            body: &source[body_start..body_end],
        });
    }

    blocks
}

/* ============================================================
   Helpers
   ============================================================ */

fn class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"public class (\w+)").expect("static regex"))
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(\[(?:Fact|Theory)\](?:\s*\[InlineData[^\]]*\])*)\s*public void (\w+)\([^)]*\)\s*\{",
        )
        .expect("static regex")
    })
}

/// Offset of the `}` closing the block whose `{` ends just before `from`.
/// Braces are counted raw; ones inside string literals are not skipped.
fn matching_brace(source: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;

    for (offset, byte) in source.as_bytes()[from..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + offset);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SOURCE: &str = indoc! {r#"
        using Xunit;

        public class PagedResultHelperTests
        {
            [Fact]
            public void Create_ShouldReturnPage()
            {
                var items = new List<int> { 1, 2, 3 };
                if (items.Count > 0) { Assert.Equal(3, items.Count); }
            }

            private void Helper() { }

            [Theory]
            [InlineData(1, 2)]
            [InlineData(3, 4)]
            [InlineData(5, 6)]
            public void Add_ShouldSum(int a, int b)
            {
                Assert.True(a < b);
            }
        }
    "#};

    #[test]
    fn finds_class_name() {
        assert_eq!(class_name(SOURCE), "PagedResultHelperTests");
        assert_eq!(class_name("internal class Nope {}"), UNKNOWN_CLASS);
    }

    #[test]
    fn finds_methods_in_order_with_case_counts() {
        let blocks = method_blocks(SOURCE);
        let summary: Vec<_> = blocks.iter().map(|b| (b.name, b.case_count())).collect();
        assert_eq!(summary, vec![("Create_ShouldReturnPage", 1), ("Add_ShouldSum", 3)]);
    }

    #[test]
    fn body_stops_at_matching_brace() {
        let blocks = method_blocks(SOURCE);
        let body = blocks[0].body;
        assert!(body.contains("Assert.Equal(3, items.Count); }"));
        assert!(!body.contains("Helper"));
        assert_eq!(blocks[1].body.trim(), "Assert.True(a < b);");
    }

    #[test]
    fn unterminated_body_runs_to_end_of_text() {
        let src = "[Fact]\npublic void Broken() {\n  Assert.Fail(";
        let blocks = method_blocks(src);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "\n  Assert.Fail(");
    }

    #[test]
    fn unmarked_and_non_void_methods_are_ignored() {
        let src = indoc! {r#"
            public class T {
                public void NotATest() { }
                [Fact(Skip = "flaky")]
                public void Skipped() { }
                [Fact]
                public async Task AsyncOne() { }
            }
        "#};
        assert!(method_blocks(src).is_empty());
    }
}
