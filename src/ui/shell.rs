//! Document shell: head, styles and the small client helpers.

use super::escape;

/// Stylesheet for the whole page. Kept inline so the page renders without
/// an asset pipeline.
const STYLES: &str = r"
:root { --indigo: #4f46e5; --indigo-soft: #eef2ff; --red: #dc2626; --red-soft: #fef2f2;
        --gray-50: #f9fafb; --gray-100: #f3f4f6; --gray-300: #d1d5db; --gray-500: #6b7280;
        --gray-700: #374151; --gray-800: #1f2937; --green: #16a34a; --yellow: #eab308; }
* { box-sizing: border-box; }
body { margin: 0; min-height: 100vh; padding: 1rem; font-family: system-ui, sans-serif;
       background: linear-gradient(135deg, #eff6ff, #e0e7ff); color: var(--gray-800); }
.container { max-width: 72rem; margin: 0 auto; }
.card { background: #fff; border-radius: 1rem; box-shadow: 0 10px 15px -3px rgb(0 0 0 / .1); }
.icon { width: 1rem; height: 1rem; flex-shrink: 0; }
.icon-md { width: 1.25rem; height: 1.25rem; }
.icon-lg { width: 2rem; height: 2rem; }
.icon-xl { width: 4rem; height: 4rem; }
.spin { animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.header { display: flex; align-items: center; justify-content: space-between; padding: 1.5rem;
          border-radius: 1rem 1rem 0 0; }
.brand { display: flex; align-items: center; gap: .75rem; }
.brand-mark { background: var(--indigo); color: #fff; padding: .75rem; border-radius: .75rem; display: flex; }
.brand h1 { margin: 0; font-size: 1.5rem; }
.brand p, .muted { margin: 0; font-size: .875rem; color: var(--gray-500); }
.doc-count { display: flex; align-items: center; gap: .5rem; font-size: .875rem; color: var(--indigo); }
.banner { display: flex; align-items: center; gap: .5rem; margin-top: 1rem; padding: 1rem;
          background: var(--red-soft); border: 1px solid #fecaca; border-radius: .5rem; color: #b91c1c; }
.banner form { margin-left: auto; }
.banner button { display: flex; background: none; border: 0; color: var(--red); cursor: pointer; }
.layout { display: grid; grid-template-columns: 1fr 3fr; gap: 1rem; margin-top: 1rem; }
@media (max-width: 1024px) { .layout { grid-template-columns: 1fr; } }
.sidebar { padding: 1rem; }
.sidebar h3 { display: flex; align-items: center; gap: .5rem; margin: 0 0 .75rem; }
.sidebar h4 { font-size: .75rem; color: var(--gray-500); margin: 0 0 .5rem; letter-spacing: .05em; }
.section { margin-top: 1rem; padding-top: 1rem; border-top: 1px solid #e5e7eb; }
.upload { display: flex; align-items: center; justify-content: center; gap: .5rem; padding: .75rem 1rem;
          margin-bottom: .75rem; background: var(--indigo-soft); color: var(--indigo); border-radius: .5rem;
          cursor: pointer; font-size: .875rem; font-weight: 500; }
.upload.is-disabled { opacity: .5; cursor: not-allowed; }
.upload input { display: none; }
.clear { width: 100%; display: flex; align-items: center; justify-content: center; gap: .5rem;
         padding: .5rem 1rem; margin-bottom: .75rem; background: var(--red-soft); color: var(--red);
         border: 0; border-radius: .5rem; cursor: pointer; font-size: .875rem; }
.documents { max-height: 16rem; overflow-y: auto; display: grid; gap: .5rem; margin: 0; padding: 0; list-style: none; }
.documents li { padding: .75rem; background: var(--gray-50); border-radius: .5rem; font-size: .875rem;
                overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.tool { display: flex; align-items: center; gap: .5rem; font-size: .875rem; margin-bottom: .5rem; }
.tool--store { color: var(--green); }
.tool--search { color: #2563eb; }
.status { font-size: .75rem; color: var(--gray-500); }
.status p { margin: 0 0 .25rem; word-break: break-all; }
.dot { display: inline-block; width: .5rem; height: .5rem; border-radius: 50%; margin-right: .5rem; background: var(--green); }
.dot.is-busy { background: var(--yellow); }
.chat { display: flex; flex-direction: column; height: 600px; }
.messages { flex: 1; overflow-y: auto; padding: 1.5rem; display: flex; flex-direction: column; gap: 1rem; }
.welcome { text-align: center; color: var(--gray-500); margin-top: 5rem; }
.welcome .icon { color: var(--gray-300); }
.welcome strong { display: block; font-size: 1.125rem; margin-top: 1rem; }
.welcome p { max-width: 28rem; margin: .5rem auto 0; font-size: .875rem; }
.message-row { display: flex; justify-content: flex-start; }
.message-row--user { justify-content: flex-end; }
.message { display: flex; align-items: flex-start; gap: .5rem; max-width: 48rem; }
.message-row--user .message { flex-direction: row-reverse; }
.avatar { padding: .5rem; border-radius: 9999px; color: #fff; display: flex; background: var(--green); }
.avatar--user { background: var(--indigo); }
.avatar--system { background: #9ca3af; }
.bubble { padding: 1rem; border-radius: 1rem; background: var(--gray-100); color: var(--gray-800); font-size: .875rem; }
.bubble--user { background: var(--indigo); color: #fff; }
.bubble--system { color: var(--gray-700); }
.bubble .content { margin: 0; white-space: pre-wrap; }
.tools { margin-top: .5rem; padding-top: .5rem; border-top: 1px solid var(--gray-300); }
.tools p { margin: 0 0 .25rem; font-size: .75rem; font-weight: 600; color: var(--gray-500); }
.tag { display: inline-block; font-size: .75rem; background: #fff; padding: .25rem .5rem; border-radius: .25rem;
       margin: 0 .25rem .25rem 0; color: var(--gray-700); }
.processing { display: flex; align-items: center; gap: .5rem; background: var(--gray-100); padding: 1rem;
              border-radius: 1rem; font-size: .875rem; color: var(--gray-700); }
.processing .icon { color: var(--indigo); }
.htmx-indicator { display: none; }
.htmx-request .htmx-indicator, .htmx-request.htmx-indicator { display: flex; }
.composer { padding: 1rem; border-top: 1px solid #e5e7eb; }
.composer form { display: flex; gap: .5rem; }
.composer input { flex: 1; padding: .75rem 1rem; border: 1px solid var(--gray-300); border-radius: .75rem; font-size: 1rem; }
.composer button { padding: .75rem 1.5rem; background: var(--indigo); color: #fff; border: 0; border-radius: .75rem;
                   display: flex; align-items: center; cursor: pointer; }
.composer button:disabled, .composer input:disabled { opacity: .5; cursor: not-allowed; }
.credits { font-size: .75rem; color: var(--gray-500); text-align: center; margin: .5rem 0 0; }
";

/// Client helpers used by the HTMX hooks in the workspace markup.
const SCRIPT: &str = r"
window.xyz = {
  // Echo the user's message while the request is in flight.
  echo(form) {
    const text = form.querySelector('[name=query]').value;
    const list = document.getElementById('messages');
    if (!list || !text.trim()) return;
    const row = document.createElement('div');
    row.className = 'message-row message-row--user';
    const bubble = document.createElement('div');
    bubble.className = 'bubble bubble--user';
    const p = document.createElement('p');
    p.className = 'content';
    p.textContent = text;
    bubble.append(p);
    row.append(bubble);
    list.querySelector('.welcome')?.remove();
    list.insertBefore(row, document.getElementById('processing'));
  },
  toggle(input) {
    input.form.querySelector('button').disabled = !input.value.trim();
  },
  scroll() {
    document.getElementById('messages-end')?.scrollIntoView({ behavior: 'smooth' });
  },
};
document.addEventListener('DOMContentLoaded', () => window.xyz.scroll());
document.addEventListener('htmx:afterSwap', () => window.xyz.scroll());
";

/// Wrap rendered content in the full HTML document.
pub fn html_shell(title: &str, content: &str) -> String {
    let title = escape(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="AI agent with document retrieval and web search">
    <title>{title}</title>

    <!-- HTMX (local); forms fall back to full-page posts without it -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <script>{SCRIPT}</script>
    <style>{STYLES}</style>
</head>
<body>
    <div class="container">
        {content}
    </div>
</body>
</html>"#
    )
}
