use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::models::LicenseInfo;

/// What a dependency's descriptor (POM) says about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// `<name>` directly under the root element.
    pub project_name: Option<String>,
    /// `<url>` directly under the root element.
    pub project_url: Option<String>,
    /// Declared `<licenses><license>` entries, in document order.
    pub licenses: Vec<LicenseInfo>,
}

/// Read and parse a descriptor file.
///
/// An unreadable or malformed file yields an empty [`Descriptor`] and a warning;
/// one bad dependency must not block the report for all others.
pub fn read_descriptor(path: &Path) -> Descriptor {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_descriptor(&content),
        Err(e) => {
            warn!("cannot read descriptor {}: {}", path.display(), e);
            Descriptor::default()
        }
    }
}

/// Parse descriptor XML, recovering from any malformation with an empty result.
pub fn parse_descriptor(xml: &str) -> Descriptor {
    match try_parse(xml) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!("malformed descriptor, treating as declaring no licenses: {}", e);
            Descriptor::default()
        }
    }
}

fn try_parse(xml: &str) -> Result<Descriptor, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut descriptor = Descriptor::default();
    let mut buf = Vec::new();
    // Element path below the root, e.g. "licenses/license/name".
    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<LicenseInfo> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                stack.push(tag);
                if relative_path(&stack) == "licenses/license" {
                    current = Some(LicenseInfo::default());
                }
            }
            Event::Empty(ref e) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                stack.push(tag);
                if relative_path(&stack) == "licenses/license" {
                    descriptor.licenses.push(LicenseInfo::default());
                }
                stack.pop();
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                assign_text(&stack, &text, &mut descriptor, current.as_mut());
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e).into_owned();
                assign_text(&stack, text.trim(), &mut descriptor, current.as_mut());
            }
            Event::End(_) => {
                if relative_path(&stack) == "licenses/license" {
                    if let Some(license) = current.take() {
                        descriptor.licenses.push(license);
                    }
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!(
        "descriptor declares {} license(s), project name {:?}",
        descriptor.licenses.len(),
        descriptor.project_name
    );
    Ok(descriptor)
}

fn relative_path(stack: &[String]) -> String {
    stack.get(1..).map(|rest| rest.join("/")).unwrap_or_default()
}

fn assign_text(
    stack: &[String],
    text: &str,
    descriptor: &mut Descriptor,
    current: Option<&mut LicenseInfo>,
) {
    match relative_path(stack).as_str() {
        "name" => descriptor.project_name = Some(text.to_string()),
        "url" => descriptor.project_url = Some(text.to_string()),
        "licenses/license/name" => {
            if let Some(license) = current {
                license.name.push_str(text);
            }
        }
        "licenses/license/url" => {
            if let Some(license) = current {
                license.url.push_str(text);
            }
        }
        _ => {}
    }
}
