// VDB - Verification Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{HeapView, StatePanel, NO_GRAPH_MESSAGE};
use crate::error::DebugError;

/// Location of the rendered image of the snapshot stored in `slot`
pub fn heap_image_path(image_dir: &Path, slot: usize) -> PathBuf {
    image_dir.join(format!("heap_{slot}.svg"))
}

/// Write the rendered image of the snapshot stored in `slot`
pub fn write_heap_image(image_dir: &Path, slot: usize, image: &str) -> Result<PathBuf, DebugError> {
    let path = heap_image_path(image_dir, slot);
    fs::create_dir_all(image_dir)
        .and_then(|_| fs::write(&path, image))
        .map_err(|source| DebugError::HeapImage { path: path.clone(), source })?;
    debug!(?path, "heap image written");
    Ok(path)
}

/// Convert free text for inline display: newlines become line breaks and a
/// tab becomes four non-breaking spaces.
pub fn string_to_html(s: &str) -> String {
    s.replace('\n', "<br />\n    ").replace('\t', "&nbsp;&nbsp;&nbsp;&nbsp;")
}

/// Renders a [`HeapView`] into the document shown next to the source
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    image_dir: PathBuf,
}

impl HtmlRenderer {
    /// Create a renderer referencing heap images under `image_dir`
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self { image_dir: image_dir.into() }
    }

    /// Directory the heap images are expected in
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Render the whole document.
    ///
    /// `global_info` is appended below the panels and `source_uri` is linked
    /// at the bottom.
    pub fn render(&self, view: &HeapView, global_info: &str, source_uri: &str) -> String {
        let body = match view {
            HeapView::Empty => format!(" <p>{NO_GRAPH_MESSAGE}</p>"),
            HeapView::Single(panel) => format!(
                " <h1 style=\"color:{}\">{}</h1>{}",
                panel.label.color(),
                panel.label.title(),
                self.panel(panel)
            ),
            HeapView::Comparison { current, previous } => format!(
                " <table>\n  <tr><td>\n   {}\n   {}\n  </td><td>\n   {}\n   {}\n  </td></tr>\n </table>",
                heading(current),
                self.panel(current),
                heading(previous),
                self.panel(previous),
            ),
        };

        format!(
            "<head>\n<style>\n table td, table td * {{\n  vertical-align: top;\n }}\n</style>\n</head>\n\
             <body>\n{body}\n <p>{}</p>\n <a href='{source_uri}'>view source</a>\n</body>",
            string_to_html(global_info)
        )
    }

    fn panel(&self, panel: &StatePanel) -> String {
        let mut out = format!(
            "\n    <h2>file: {}<br />{}: {}</h2>\
             \n    <h3>state {}<br />position: {}</h3>\
             \n    <img src=\"{}\"></img><br />\n    ",
            panel.file_name,
            panel.method_type,
            panel.method_name,
            panel.state,
            panel.position,
            heap_image_path(&self.image_dir, panel.slot).display(),
        );

        if panel.conditions.is_empty() {
            out.push_str("<h3>No path condition</h3>");
        } else {
            out.push_str("<h3>Path condition</h3>\n    <table border=\"solid\">");
            for row in &panel.conditions {
                if row.is_new {
                    out.push_str(&format!("     <tr><td><b>{}</b></td></tr>\n", row.text));
                } else {
                    out.push_str(&format!("     <tr><td>{}</td></tr>\n", row.text));
                }
            }
            out.push_str("\n    </table>");
        }

        out.push_str(&format!("\n    <p>{}</p><br />", string_to_html(&panel.state_infos)));
        out
    }
}

fn heading(panel: &StatePanel) -> String {
    format!("<h1 style=\"color:{}\">{}</h1>", panel.label.color(), panel.label.title())
}
