//! Markup rendering of a `DirectoryNode` tree.
//!
//! Rendering is a pure function of the tree: nothing here touches the
//! filesystem.

use crate::size::format_size;
use crate::tree::{DirectoryNode, FileEntry};
use std::fmt::{self, Write};

/// Script function invoked by an expand link.
pub const EXPAND_ACTION: &str = "ExpandFolder";
/// Script function invoked by a collapse link.
pub const COLLAPSE_ACTION: &str = "CollapseFolder";

const FOLDER_ICON: &str = "folder_Closed_16xLG.png";
const FILE_ICON: &str = "document_16xLG.png";

/// Configuration for the rendering pipeline.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to emit `<img>` icons.
    pub show_icons: bool,
    /// URL prefix the icon files are served under.
    pub icon_root: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            show_icons: true,
            icon_root: "/images".to_string(),
        }
    }
}

/// Escape text for element content and double-quoted attributes.
pub fn escape_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c if c.is_control() => {
                let _ = write!(out, "&#x{:X};", c as u32);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Encode a root-relative path as a single-quoted script string argument
/// inside a double-quoted attribute.
pub fn encode_action_path(relative_path: &str) -> String {
    let mut script = String::with_capacity(relative_path.len());
    for c in relative_path.chars() {
        match c {
            '\\' => script.push_str("\\\\"),
            '\'' => script.push_str("\\'"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFF {
                    let _ = write!(script, "\\x{:02X}", code);
                } else {
                    let _ = write!(script, "\\u{:04X}", code);
                }
            }
            _ => script.push(c),
        }
    }
    escape_markup(&script)
}

/// Render a whole tree; `root` is drawn without a collapse link.
pub fn render_tree(root: &DirectoryNode, config: &RenderConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    render_node(&mut out, root, true, config)?;
    Ok(out)
}

/// Emit one directory and, when it is expanded, everything beneath it.
pub fn render_node<W: Write>(
    out: &mut W,
    node: &DirectoryNode,
    is_root: bool,
    config: &RenderConfig,
) -> fmt::Result {
    let name = escape_markup(&node.name);

    if !node.expanded {
        if node.error.is_some() {
            write!(out, "<div class=\"folder-view-unreadable-directory\">")?;
            folder_icon(out, config)?;
            return write!(out, "{name} (0)</div>");
        }
        write!(
            out,
            "<div class=\"folder-view-expandable-directory\">\
             <a href=\"javascript:void(0);\" class=\"folder-view-folder-link\" \
             onclick=\"{EXPAND_ACTION}('{}')\">+ ",
            encode_action_path(&node.relative_path)
        )?;
        folder_icon(out, config)?;
        return write!(out, "{name}</a> ({})</div>", node.item_count);
    }

    if is_root {
        write!(out, "<div class=\"folder-view-expanded-directory\">")?;
        folder_icon(out, config)?;
        write!(out, "{name}</div>")?;
    } else {
        write!(
            out,
            "<div class=\"folder-view-expanded-directory\">\
             <a href=\"javascript:void(0);\" class=\"folder-view-folder-link\" \
             onclick=\"{COLLAPSE_ACTION}('{}')\">- ",
            encode_action_path(&node.relative_path)
        )?;
        folder_icon(out, config)?;
        write!(out, "{name}</a></div>")?;
    }

    write!(out, "<div class=\"folder-view-indent\">")?;
    for child in &node.children {
        render_node(out, child, false, config)?;
    }
    for file in &node.files {
        render_file(out, file, config)?;
    }
    write!(out, "</div>")
}

fn render_file<W: Write>(out: &mut W, file: &FileEntry, config: &RenderConfig) -> fmt::Result {
    write!(out, "<div class=\"folder-view-file\">&nbsp;")?;
    if config.show_icons {
        write!(
            out,
            "<img src=\"{}/{FILE_ICON}\" class=\"folder-view-document-icon\" />",
            escape_markup(&config.icon_root)
        )?;
    }
    write!(
        out,
        "<a href=\"javascript:void(0);\" class=\"folder-view-file-link\">{}</a> ({})</div>",
        escape_markup(&file.filename),
        format_size(file.size_bytes)
    )
}

fn folder_icon<W: Write>(out: &mut W, config: &RenderConfig) -> fmt::Result {
    if !config.show_icons {
        return Ok(());
    }
    write!(
        out,
        "<img src=\"{}/{FOLDER_ICON}\" class=\"folder-view-folder-icon\" /> ",
        escape_markup(&config.icon_root)
    )
}

/// Emit a hidden input carrying an out-of-band value for the caller.
pub fn render_hidden_field<W: Write>(out: &mut W, id: &str, value: &str) -> fmt::Result {
    write!(
        out,
        "<input type=\"hidden\" id=\"{}\" value=\"{}\" />",
        escape_markup(id),
        escape_markup(value)
    )
}
