//! Embedded HTML templates for the search page.

/// Search page HTML template.
pub const HOME: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>docindex // Search</title>
    <style>
        :root {
            --bg-app: #fafaf9;
            --bg-panel: #ffffff;
            --border-subtle: #e7e5e4;
            --text-primary: #1c1917;
            --text-secondary: #57534e;
            --text-tertiary: #a8a29e;
            --accent: #2563eb;
            --state-error: #dc2626;
            --font-sans: "Inter", -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            --radius-md: 6px;
        }
        * { box-sizing: border-box; }
        body { margin: 0; background: var(--bg-app); color: var(--text-primary); font-family: var(--font-sans); }
        .app-container { max-width: 760px; margin: 0 auto; padding: 40px 24px; display: flex; flex-direction: column; gap: 24px; }
        header { display: flex; justify-content: space-between; align-items: baseline; border-bottom: 1px solid var(--border-subtle); padding-bottom: 16px; }
        .brand { font-weight: 600; font-size: 18px; letter-spacing: -0.02em; }
        .doc-count { font-size: 12px; color: var(--text-tertiary); }
        .search-input { width: 100%; padding: 12px 14px; font-size: 15px; border: 1px solid var(--border-subtle); border-radius: var(--radius-md); background: var(--bg-panel); }
        .search-input:focus { outline: none; border-color: var(--accent); }
        .hint { font-size: 12px; color: var(--text-tertiary); }
        .result-item { padding: 12px 0; border-bottom: 1px solid var(--border-subtle); }
        .result-item a { color: var(--accent); text-decoration: none; font-weight: 500; }
        .result-meta { font-size: 12px; color: var(--text-secondary); margin-top: 4px; }
        .state-msg { color: var(--text-secondary); }
        .state-msg.error { color: var(--state-error); }
    </style>
</head>
<body>
    <div class="app-container">
        <header>
            <div class="brand">docindex</div>
            <div class="doc-count" id="doc-count"></div>
        </header>
        <input type="text" id="q" class="search-input" placeholder="Search chapters..." autocomplete="off" spellcheck="false">
        <div class="hint">Use +term to require, -term to exclude, title:term to scope, term* for prefixes, term~1 for typos.</div>
        <div id="results"></div>
    </div>
    <script>
        const el={q:document.getElementById('q'),list:document.getElementById('results'),count:document.getElementById('doc-count')};
        const esc=s=>String(s??'').replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
        async function fetchMetrics(){try{const r=await fetch('/api/metrics');const d=await r.json();el.count.textContent=d.index_built?`${d.indexed_docs} documents`:'index not built';}catch(e){el.count.textContent='offline';}}
        async function runSearch(){const query=el.q.value.trim();if(!query){el.list.innerHTML='';return;}try{const r=await fetch(`/api/search?q=${encodeURIComponent(query)}`);const d=await r.json();if(!r.ok)throw new Error(d.error||r.status);render(d.results,query);}catch(e){el.list.innerHTML=`<div class="state-msg error">${esc(e.message)}</div>`;}}
        function render(hits,query){if(!hits.length){el.list.innerHTML=`<div class="state-msg">Nothing matched "${esc(query)}".</div>`;return;}el.list.innerHTML=hits.map(h=>{const label=h.number?`${esc(h.type)} ${esc(h.number)}`:esc(h.type);return`<div class="result-item"><a href="${esc(h.url)}">${esc(h.title)}</a><div class="result-meta">${label} &middot; score ${Number(h.score).toFixed(2)}</div></div>`;}).join('');}
        let timer=null;el.q.addEventListener('input',()=>{clearTimeout(timer);timer=setTimeout(runSearch,150);});
        fetchMetrics();
    </script>
</body>
</html>
"#;
