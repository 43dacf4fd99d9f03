//! Minimal host page embedding the preview frame and the visible toast.

use crate::notify::Notification;
use crate::sandbox::escape_attr;

const HOST_STYLES: &str = "body{margin:0;font-family:sans-serif;background:#f3f4f6;}\
.preview{width:100%;height:calc(100vh - 4rem);border:none;background:#fff;}\
.preview iframe{width:100%;height:100%;border:none;}\
.toast{position:fixed;bottom:0.25rem;left:50%;transform:translateX(-50%);width:24rem;\
padding:0.5rem;color:#fff;border-radius:0.5rem;}\
.bg-green-500{background:#22c55e;}.bg-red-500{background:#ef4444;}";

/// Wrap a rendered frame element into a standalone page.
pub fn host_page(title: &str, frame_markup: &str, notification: Option<&Notification>) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_attr(title),
        HOST_STYLES
    );
    if let Some(n) = notification {
        html.push_str(&format!(
            "<div id=\"toast\" class=\"toast {}\"><p class=\"font-bold\">{}</p><p id=\"toast-message\">{}</p></div>\n",
            n.kind.color_class(),
            n.kind.title(),
            escape_attr(&n.message)
        ));
    }
    html.push_str("<div class=\"preview\">");
    html.push_str(frame_markup);
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
