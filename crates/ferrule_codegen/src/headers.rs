//! Ordering `#include` directives in generated sources.

use ferrule_common::dedup;

/// The pybind11 root header. It must follow the other pybind11 headers, so it
/// always closes the third-party group.
pub const PYBIND11_ROOT_HEADER: &str = "<pybind11/pybind11.h>";

/// Headers split into the groups they are emitted in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderGroups {
    /// Anything not matching the patterns below.
    pub other: Vec<String>,
    /// Project headers, `"name.h"` or `"name.hpp"`.
    pub local: Vec<String>,
    /// Third-party headers, `<name.h>` or `<name.hpp>`, ending with
    /// [`PYBIND11_ROOT_HEADER`].
    pub third_party: Vec<String>,
    /// Standard library headers, `<name>` without an extension.
    pub stdlib: Vec<String>,
}

impl HeaderGroups {
    /// All groups in emission order.
    pub fn groups(&self) -> [&[String]; 4] {
        [
            self.other.as_slice(),
            self.local.as_slice(),
            self.third_party.as_slice(),
            self.stdlib.as_slice(),
        ]
    }

    /// Renders `#include` lines, with a blank line between non-empty groups.
    pub fn render(&self) -> String {
        self.groups()
            .into_iter()
            .filter(|group| !group.is_empty())
            .map(|group| {
                group
                    .iter()
                    .map(|h| format!("#include {h}\n"))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn is_local(header: &str) -> bool {
    header
        .strip_prefix('"')
        .and_then(|h| h.strip_suffix('"'))
        .is_some_and(|h| h.ends_with(".h") || h.ends_with(".hpp"))
}

fn is_third_party(header: &str) -> bool {
    header
        .strip_prefix('<')
        .and_then(|h| h.strip_suffix('>'))
        .is_some_and(|h| h.ends_with(".h") || h.ends_with(".hpp"))
}

fn is_stdlib(header: &str) -> bool {
    header
        .strip_prefix('<')
        .and_then(|h| h.strip_suffix('>'))
        .is_some_and(|h| !h.is_empty() && !h.contains('.'))
}

/// Groups headers, trimming whitespace and dropping duplicates within each
/// group while keeping first-seen order.
pub fn group_headers<I, S>(headers: I) -> HeaderGroups
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups = HeaderGroups::default();
    for header in headers {
        let header = header.as_ref().trim();
        if header.is_empty() || header == PYBIND11_ROOT_HEADER {
            continue;
        }
        let bucket = if is_local(header) {
            &mut groups.local
        } else if is_third_party(header) {
            &mut groups.third_party
        } else if is_stdlib(header) {
            &mut groups.stdlib
        } else {
            &mut groups.other
        };
        bucket.push(header.to_string());
    }

    groups.other = dedup(groups.other);
    groups.local = dedup(groups.local);
    groups.stdlib = dedup(groups.stdlib);
    groups.third_party = dedup(groups.third_party);
    groups.third_party.push(PYBIND11_ROOT_HEADER.to_string());
    groups
}
