//! Chat widget host page.
//!
//! Server-rendered HTML for the widget: conversation, input form and clear
//! button. The only script is the scroll-to-latest step.

use crate::render::escape_html;
use crate::widget::{ChatWidget, Conversation};

/// Build the complete HTML page for the widget's current state.
pub fn build_widget_html(title: &str, widget: &ChatWidget<Conversation>) -> String {
    let title = escape_html(title);
    let conversation = widget.surface();
    let messages = conversation.to_html();

    // While a reply is pending other viewers poll until the input comes back.
    let (disabled, refresh) = if widget.input_enabled() {
        (" autofocus", "")
    } else {
        (" disabled", "<meta http-equiv=\"refresh\" content=\"1\">\n")
    };

    let scroll = conversation
        .scroll_plan()
        .map(|plan| {
            format!(
                r#"<script>
(function(){{
  var box=document.getElementById("chatBox");
  var last=document.getElementById("{anchor}");
  if(!last)return;
  last.scrollIntoView({{behavior:"smooth",block:"end"}});
  setTimeout(function(){{box.scrollTop=box.scrollHeight}},{delay});
}})();
</script>"#,
                anchor = plan.anchor,
                delay = plan.settle_delay.as_millis()
            )
        })
        .unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
{refresh}<title>{title}</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box}}
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#f4f6f9;color:#222;height:100vh;display:flex;flex-direction:column}}
.header{{padding:14px 20px;background:#0084ff;color:#fff;display:flex;align-items:center;justify-content:space-between}}
.header h1{{font-size:16px;font-weight:600}}
.header button{{padding:6px 12px;border:1px solid #fff;border-radius:6px;background:transparent;color:#fff;cursor:pointer}}
.chat-box{{flex:1;overflow-y:auto;padding:20px;display:flex;flex-direction:column;gap:12px}}
.message{{display:flex;gap:8px;max-width:80%}}
.message.user{{align-self:flex-end}}
.message.bot{{align-self:flex-start}}
.bot-avatar img{{width:32px;height:32px;border-radius:50%}}
.message-content{{padding:10px 14px;border-radius:14px;font-size:14px;line-height:1.5;word-wrap:break-word}}
.message.user .message-content{{background:#0084ff;color:#fff}}
.message.bot .message-content{{background:#fff;border:1px solid #e1e4e8}}
.chat-link{{color:#0066cc;text-decoration:underline}}
.typing-indicator span{{animation:blink 1.4s infinite both;font-weight:bold}}
.typing-indicator span:nth-child(2){{animation-delay:.2s}}
.typing-indicator span:nth-child(3){{animation-delay:.4s}}
@keyframes blink{{0%{{opacity:.2}}20%{{opacity:1}}100%{{opacity:.2}}}}
.input-bar{{padding:14px 20px;background:#fff;border-top:1px solid #e1e4e8;display:flex;gap:8px}}
.input-bar input{{flex:1;padding:10px 14px;border:1px solid #ccd;border-radius:8px;font-size:14px;outline:none}}
.input-bar button{{padding:10px 20px;background:#0084ff;color:#fff;border:none;border-radius:8px;font-weight:600;cursor:pointer}}
.input-bar input:disabled,.input-bar button:disabled{{opacity:.5;cursor:not-allowed}}
</style>
</head>
<body>
<div class="header">
  <h1>{title}</h1>
  <form method="post" action="/clear"><button id="deleteHistory" type="submit">Clear history</button></form>
</div>
<div class="chat-box" id="chatBox">{messages}</div>
<form class="input-bar" id="messageForm" method="post" action="/send">
  <input id="messageInput" name="message" type="text" placeholder="Type a message..." autocomplete="off"{disabled}>
  <button type="submit"{disabled}>Send</button>
</form>
{scroll}
</body>
</html>
"##
    )
}
