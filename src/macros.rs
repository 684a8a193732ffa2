use std::fmt;

pub struct RenderNode<F>(pub F);
impl<F> fmt::Display for RenderNode<F>
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

/// Attribute names are either bare identifiers (`class`, `viewBox`) or string
/// literals for names that aren't valid identifiers (`"aria-hidden"`, `"xlink:href"`).
#[doc(hidden)]
#[macro_export]
macro_rules! attr_name {
    ($attr:ident) => {
        stringify!($attr)
    };
    ($attr:literal) => {
        $attr
    };
}

/// Builds an element that renders itself through `Display`.
///
/// Attribute values and children are written as-is, escaping is up to the caller.
/// An element without children is written self-closed, pass `""` as the only child
/// to get an explicit closing tag instead.
#[macro_export]
macro_rules! node {
    ($kind:ident $(, $attr:tt = $val:expr )* => $($child:expr),+ $(,)?) => {
        $crate::macros::RenderNode(|f: &mut std::fmt::Formatter<'_>| {
            write!(f, "<{}", stringify!($kind))?;
            $(write!(f, r#" {}="{}""#, $crate::attr_name!($attr), $val)?;)*
            write!(f, ">")?;
            $(write!(f, "{}", $child)?;)+
            write!(f, "</{}>", stringify!($kind))
        })
    };

    ($kind:ident $(, $attr:tt = $val:expr )* $(,)?) => {
        $crate::macros::RenderNode(|f: &mut std::fmt::Formatter<'_>| {
            write!(f, "<{}", stringify!($kind))?;
            $(write!(f, r#" {}="{}""#, $crate::attr_name!($attr), $val)?;)*
            write!(f, " />")
        })
    };
}

#[macro_export]
macro_rules! group_nodes {
    ($lnode:expr $(, $rnode:expr )+) => {
        $crate::macros::RenderNode(|f: &mut std::fmt::Formatter<'_>| {
            write!(f, "{}", $lnode)?;
            $(write!(f, "{}", $rnode)?;)+
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn node_with_children() {
        let html = node! { nav, class = "navbar" =>
            node! { a, href = "/music" => "Music" },
            node! { a, href = "/words" => "Words" },
        }
        .to_string();
        assert_eq!(
            html,
            r#"<nav class="navbar"><a href="/music">Music</a><a href="/words">Words</a></nav>"#
        );
    }

    #[test]
    fn literal_attribute_names() {
        let html = node! { svg, "aria-hidden" = "true", viewBox = "0 0 1 1" =>
            node! { use, "xlink:href" = "#icon" => "" },
        }
        .to_string();
        assert_eq!(
            html,
            r##"<svg aria-hidden="true" viewBox="0 0 1 1"><use xlink:href="#icon"></use></svg>"##
        );
    }

    #[test]
    fn childless_node_is_self_closed() {
        assert_eq!(node! { meta, charset = "utf-8" }.to_string(), r#"<meta charset="utf-8" />"#);
    }

    #[test]
    fn grouped_nodes_render_in_order() {
        let html = group_nodes!(node! { br }, node! { hr }).to_string();
        assert_eq!(html, "<br /><hr />");
    }
}
