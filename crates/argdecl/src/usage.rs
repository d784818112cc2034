//! Usage line rendering.

use crate::def::Arg;

/// Render one argument.
///
/// Ordered arguments render as their bare name (`name...` in remainder mode).
/// Labeled arguments render as `--a | --b` followed by one `name_val_N`
/// placeholder per value, wrapped in `<...>` when required and `[...]`
/// otherwise.
pub fn render(arg: &Arg, include_help: bool) -> String {
    let mut out = if arg.is_ordered() {
        let mut out = arg.name().to_string();
        if arg.is_remainder() {
            out.push_str("...");
        }
        out
    } else {
        let mut out = arg.labels().join(" | ");
        for i in 1..=arg.arg_count() {
            out.push_str(&format!(" {}_val_{i}", arg.name()));
        }
        if arg.is_remainder() {
            out.push_str(&format!(" {}_val...", arg.name()));
        }
        if arg.is_required() {
            format!("<{out}>")
        } else {
            format!("[{out}]")
        }
    };

    if include_help {
        out.push('\n');
        out.push_str(arg.help());
    }
    out
}

/// Render a whole set: labeled arguments first, then ordered ones in
/// declaration order.
///
/// Without help the parts are joined by spaces into one line; with help each
/// argument gets its own block.
pub fn render_all<'a>(args: impl IntoIterator<Item = &'a Arg>, include_help: bool) -> String {
    let (ordered, labeled): (Vec<&Arg>, Vec<&Arg>) =
        args.into_iter().partition(|a| a.is_ordered());
    let parts: Vec<String> = labeled
        .into_iter()
        .chain(ordered)
        .map(|a| render(a, include_help))
        .collect();
    let sep = if include_help { "\n" } else { " " };
    parts.join(sep)
}
