//! Self-registering route catalog.
//!
//! Appends, via ordinary registrations, a machine-readable description of
//! every route registered so far plus a small static viewer. The entries
//! gain no special priority: they are appended last, so earlier user routes
//! shadow them, and the catalog reflects the table as it stood when
//! [`register`] ran.

use crate::app::AppInfo;
use crate::dispatcher::Handler;
use crate::router::{HandlerKind, MethodFilter, PatternError, RouteTable};
use http::Method;
use serde::Serialize;
use std::sync::Arc;

const VIEWER_HTML: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Route Catalog</title>
  <script src="/docs/viewer.js" defer></script>
</head>
<body>
  <h1 id="title"></h1>
  <p id="description"></p>
  <table border="1" cellpadding="4">
    <thead><tr><th>Method</th><th>Path</th><th>Kind</th></tr></thead>
    <tbody id="routes"></tbody>
  </table>
</body>
</html>
"#;

const VIEWER_JS: &str = r#"fetch('/docs.json')
  .then((r) => r.json())
  .then((catalog) => {
    document.getElementById('title').textContent =
      catalog.name + ' v' + catalog.version;
    document.getElementById('description').textContent = catalog.description;
    const tbody = document.getElementById('routes');
    for (const route of catalog.routes) {
      const tr = document.createElement('tr');
      for (const cell of [route.method, route.path, route.kind]) {
        const td = document.createElement('td');
        td.textContent = cell;
        tr.appendChild(td);
      }
      tbody.appendChild(tr);
    }
  });
"#;

/// One route entry in the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDoc {
    pub method: String,
    pub path: String,
    pub kind: String,
}

/// Machine-readable description of an application's registered routes.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub name: String,
    pub version: String,
    pub description: String,
    pub host: String,
    pub routes: Vec<RouteDoc>,
}

/// Describe the routes registered so far.
#[must_use]
pub fn describe(table: &RouteTable, info: &AppInfo) -> Catalog {
    let routes = table
        .entries()
        .iter()
        .map(|entry| RouteDoc {
            method: entry.method.to_string(),
            path: entry.pattern.as_str().to_string(),
            kind: entry.kind.as_str().to_string(),
        })
        .collect();
    Catalog {
        name: info.name.clone(),
        version: info.version.clone(),
        description: info.description.clone(),
        host: info.host.clone(),
        routes,
    }
}

/// Append the catalog routes to the table.
///
/// Registers three ordinary entries: a catch-all middleware serving the
/// viewer script, the viewer page at `GET /docs`, and the catalog JSON at
/// `GET /docs.json`.
///
/// # Errors
///
/// Propagates [`PatternError`] from registration.
pub fn register(table: &mut RouteTable, info: &AppInfo) -> Result<(), PatternError> {
    let catalog = serde_json::to_value(describe(table, info))
        .unwrap_or_else(|_| serde_json::json!({}));

    // Viewer assets ride on a catch-all middleware so they can be served
    // from under /docs/ without one entry per file.
    let assets: Handler = Arc::new(|req, res, next| {
        if req.method == Method::GET && req.path == "/docs/viewer.js" {
            res.set_header("Content-Type", "application/javascript");
            res.send(VIEWER_JS);
        } else {
            next.run(req, res);
        }
    });
    table.register(MethodFilter::Any, "/(.*)", HandlerKind::Middleware, assets)?;

    let page: Handler = Arc::new(|_req, res, _next| {
        res.set_header("Content-Type", "text/html");
        res.send(VIEWER_HTML);
    });
    table.register(
        MethodFilter::Only(Method::GET),
        "/docs",
        HandlerKind::Endpoint,
        page,
    )?;

    let json: Handler = Arc::new(move |_req, res, _next| {
        res.json(catalog.clone());
    });
    table.register(
        MethodFilter::Only(Method::GET),
        "/docs.json",
        HandlerKind::Endpoint,
        json,
    )?;

    Ok(())
}
