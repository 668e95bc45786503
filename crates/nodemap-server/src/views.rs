//! HTML pages.

use url::form_urlencoded;

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; } \
                     nav a { margin-right: 1em; } \
                     .error { color: #b00; white-space: pre-wrap; }";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n<nav><a href=\"/\">Home</a>\
         <a href=\"/graph/\">Graph</a><a href=\"/api/nodes\">Nodes</a>\
         <a href=\"/api/roles\">Roles</a></nav>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

pub fn index_page(node_count: usize, role_count: usize) -> String {
    page(
        "Nodemap",
        &format!(
            "<h1>Nodemap</h1>\n<p>{} nodes, {} roles.</p>\n\
             <p><a href=\"/graph/\">Show node map</a> \
             (<a href=\"/graph/?hostnames=true\">with hostnames</a>)</p>",
            node_count, role_count
        ),
    )
}

/// Builds the page showing the rendered map.
///
/// `version` is appended to the image URL so a new render is never served
/// from the browser cache. The hostname toggle keeps the `env` filter.
pub fn graph_page(show_hostnames: bool, env: Option<&str>, version: u128) -> String {
    let toggle = if show_hostnames {
        format!("<a href=\"{}\">Hide hostnames</a>", graph_href(false, env))
    } else {
        format!("<a href=\"{}\">Show hostnames</a>", graph_href(true, env))
    };
    let heading = match env {
        Some(env) => format!("Node map: {}", escape_html(env)),
        None => "Node map".to_string(),
    };
    page(
        "Node map",
        &format!(
            "<h1>{heading}</h1>\n<p>{toggle}</p>\n\
             <img src=\"/static/img/node_map.svg?v={version}\" alt=\"Node map\">"
        ),
    )
}

/// Link to the graph page, already escaped for an attribute value.
fn graph_href(show_hostnames: bool, env: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if show_hostnames {
        query.append_pair("hostnames", "true");
    }
    if let Some(env) = env {
        query.append_pair("env", env);
    }
    let query = query.finish();
    if query.is_empty() {
        "/graph/".to_string()
    } else {
        escape_html(&format!("/graph/?{query}"))
    }
}

pub fn graph_error_page(message: &str) -> String {
    page(
        "Node map",
        &format!(
            "<h1>Node map</h1>\n<p>The node map could not be rendered:</p>\n\
             <p class=\"error\">{}</p>",
            escape_html(message)
        ),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_page_escapes_message() {
        let html = graph_error_page("<script>\"x\" & y</script>");
        assert!(html.contains("&lt;script&gt;&quot;x&quot; &amp; y&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_graph_page_links_image() {
        let html = graph_page(false, Some("production"), 42);
        assert!(html.contains("<img src=\"/static/img/node_map.svg?v=42\""));
        assert!(html.contains("Node map: production"));
        assert!(html.contains("Show hostnames"));
    }

    #[test]
    fn test_hostname_toggle_keeps_env() {
        let html = graph_page(false, Some("production"), 0);
        assert!(html.contains("href=\"/graph/?hostnames=true&amp;env=production\""));

        let html = graph_page(true, Some("production"), 0);
        assert!(html.contains("href=\"/graph/?env=production\">Hide hostnames"));

        let html = graph_page(true, None, 0);
        assert!(html.contains("href=\"/graph/\">Hide hostnames"));
    }

    #[test]
    fn test_hostname_toggle_encodes_env() {
        let html = graph_page(false, Some("qa & \"dev\"/eu"), 0);
        assert!(html.contains("?hostnames=true&amp;env=qa+%26+%22dev%22%2Feu\""));
    }
}
