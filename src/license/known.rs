/// Canonical name for a well-known license URL, ignoring scheme, `www.`, and
/// a trailing `.txt` / `.html` / `.php` / `/`.
pub fn canonical_name(url: &str) -> Option<&'static str> {
    let key = normalize_url(url);
    let name = match key.as_str() {
        "apache.org/licenses/license-2.0" => "Apache License, version 2.0",
        "opensource.org/licenses/mit-license" | "opensource.org/licenses/mit" => "MIT License",
        "opensource.org/licenses/bsd-license" | "opensource.org/licenses/bsd-3-clause" => {
            "BSD 3-Clause License"
        }
        "opensource.org/licenses/bsd-2-clause" => "BSD 2-Clause License",
        "opensource.org/licenses/isc-license" | "opensource.org/licenses/isc" => "ISC License",
        "eclipse.org/legal/epl-v10" | "eclipse.org/org/documents/epl-v10" => {
            "Eclipse Public License 1.0"
        }
        "gnu.org/licenses/old-licenses/lgpl-2.1" => {
            "GNU Lesser General Public License, version 2.1"
        }
        "gnu.org/licenses/old-licenses/gpl-2.0" => "GNU General Public License, version 2",
        "mozilla.org/mpl/2.0" => "Mozilla Public License 2.0",
        _ => return None,
    };
    Some(name)
}

fn normalize_url(url: &str) -> String {
    let lower = url.trim().to_lowercase();
    let mut rest = lower.as_str();
    for prefix in ["https://", "http://"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
        }
    }
    if let Some(stripped) = rest.strip_prefix("www.") {
        rest = stripped;
    }
    let mut rest = rest.trim_end_matches('/');
    for suffix in [".txt", ".html", ".php"] {
        if let Some(stripped) = rest.strip_suffix(suffix) {
            rest = stripped;
            break;
        }
    }
    rest.to_string()
}
