//! Text codec for SDK-style project files.
//!
//! `decode` reads the `Version` property and the `PackageReference` items
//! into a [`ProjectManifest`]. `encode` writes a manifest back into the
//! original text, touching only what changed:
//!
//! - the version property text
//! - reference elements that were removed (with their line, and with their
//!   `ItemGroup` when it ends up empty)
//! - reference elements that were added (next to the last surviving
//!   reference, or in a new `ItemGroup` before `</Project>`)
//! - version constraints of surviving references that differ
//!
//! Comments, whitespace and every other element are left untouched.

use super::{DependencyReference, ProjectManifest};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>|<\?.*?\?>").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([A-Za-z_][\w.:-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#).unwrap()
});

static PROPERTY_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<PropertyGroup\b[^>]*?>(.*?)</PropertyGroup\s*>").unwrap());

static VERSION_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<Version(?:\s[^>]*[^/>])?\s*>(.*?)</Version\s*>").unwrap());

static ITEM_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<ItemGroup\b[^>]*?>(.*?)</ItemGroup\s*>").unwrap());

static PACKAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<PackageReference\b([^>]*?)(?:/>|>(.*?)</PackageReference\s*>)").unwrap()
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s*([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Reads the manifest out of project file text.
pub fn decode(source: &str) -> Result<ProjectManifest, String> {
    let scan = Scan::new(source)?;
    let version = scan
        .version
        .clone()
        .ok_or_else(|| "missing <Version> property".to_string())?;

    let references = scan
        .references
        .iter()
        .map(|el| {
            DependencyReference::new(
                el.name.clone(),
                el.version.as_ref().map(|site| unescape(&source[site.value()])),
            )
        })
        .collect();

    Ok(ProjectManifest {
        version: unescape(&source[version]),
        references,
    })
}

/// Writes `manifest` into `source`, returning the updated text.
pub fn encode(source: &str, manifest: &ProjectManifest) -> Result<String, String> {
    let scan = Scan::new(source)?;
    let version = scan
        .version
        .clone()
        .ok_or_else(|| "missing <Version> property".to_string())?;
    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };

    let mut edits: Vec<(Range<usize>, String)> = vec![(version, escape(&manifest.version))];

    // Source elements are matched in order against the manifest; anything the
    // manifest skipped over was removed, anything left over is new.
    let mut kept = vec![false; scan.references.len()];
    let mut next = 0;
    for (idx, el) in scan.references.iter().enumerate() {
        let Some(wanted) = manifest.references.get(next) else {
            break;
        };
        if wanted.name != el.name {
            continue;
        }
        kept[idx] = true;
        next += 1;
        if let Some(edit) = version_edit(source, el, wanted.version.as_deref()) {
            edits.push(edit);
        }
    }
    let added = &manifest.references[next..];

    let target = scan
        .references
        .iter()
        .zip(&kept)
        .rev()
        .find(|(_, kept)| **kept)
        .map(|(el, _)| el);

    for (group_idx, group) in scan.item_groups.iter().enumerate() {
        let members: Vec<_> = scan
            .references
            .iter()
            .zip(&kept)
            .filter(|(el, _)| el.group == Some(group_idx))
            .collect();
        let removed: Vec<_> = members
            .iter()
            .filter(|(_, kept)| !**kept)
            .map(|(el, _)| el.span.clone())
            .collect();
        if removed.is_empty() {
            continue;
        }

        let is_target = target.is_some_and(|t| t.group == Some(group_idx));
        if removed.len() == members.len()
            && !is_target
            && only_whitespace_left(&source[group.body.clone()], group.body.start, &removed)
        {
            edits.push((line_span(source, group.span.clone()), String::new()));
        } else {
            for span in removed {
                edits.push((line_span(source, span), String::new()));
            }
        }
    }

    // References outside any ItemGroup are malformed MSBuild, remove them in place.
    for (el, kept) in scan.references.iter().zip(&kept) {
        if !kept && el.group.is_none() {
            edits.push((line_span(source, el.span.clone()), String::new()));
        }
    }

    if !added.is_empty() {
        edits.push(insertion(source, &scan, target, added, newline));
    }

    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start).then(b.0.end.cmp(&a.0.end)));
    let mut output = source.to_string();
    for (range, text) in edits {
        output.replace_range(range, &text);
    }
    Ok(output)
}

/// Where the version constraint of a reference lives.
#[derive(Debug, Clone)]
enum VersionSite {
    /// `Version="..."`; `attribute` covers the attribute and its leading space.
    Attribute {
        attribute: Range<usize>,
        value: Range<usize>,
    },
    /// `<Version>...</Version>` child element.
    Child {
        element: Range<usize>,
        value: Range<usize>,
    },
}

impl VersionSite {
    fn value(&self) -> Range<usize> {
        match self {
            VersionSite::Attribute { value, .. } | VersionSite::Child { value, .. } => {
                value.clone()
            }
        }
    }
}

#[derive(Debug)]
struct ReferenceElement {
    span: Range<usize>,
    name: String,
    version: Option<VersionSite>,
    /// End of the attribute list, before any `/>` or `>`.
    attributes_end: usize,
    group: Option<usize>,
}

#[derive(Debug)]
struct ItemGroupSite {
    span: Range<usize>,
    body: Range<usize>,
}

#[derive(Debug)]
struct Scan {
    version: Option<Range<usize>>,
    references: Vec<ReferenceElement>,
    item_groups: Vec<ItemGroupSite>,
    project_close: usize,
}

impl Scan {
    fn new(source: &str) -> Result<Self, String> {
        // Every pattern runs over the masked text, so markup inside comments
        // can never start or end a match. Offsets are shared with `source`.
        let masked = mask_ignored(source);
        let project_close = check_well_formed(&masked)?;

        let mut version = None;
        for group in PROPERTY_GROUP.captures_iter(&masked) {
            let Some(body) = group.get(1) else { continue };
            for prop in VERSION_ELEMENT.captures_iter(body.as_str()) {
                let Some(value) = prop.get(1) else { continue };
                let start = body.start() + value.start();
                version = Some(trimmed(source, start..start + value.len()));
            }
        }

        let item_groups: Vec<ItemGroupSite> = ITEM_GROUP
            .captures_iter(&masked)
            .filter_map(|caps| {
                let (whole, body) = (caps.get(0)?, caps.get(1)?);
                Some(ItemGroupSite {
                    span: whole.range(),
                    body: body.range(),
                })
            })
            .collect();

        let mut references = Vec::new();
        for caps in PACKAGE_REFERENCE.captures_iter(&masked) {
            let (Some(whole), Some(attrs)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let mut name = None;
            let mut version = None;
            for attr in ATTRIBUTE.captures_iter(attrs.as_str()) {
                let (Some(full), Some(key)) = (attr.get(0), attr.get(1)) else {
                    continue;
                };
                let Some(value) = attr.get(2).or_else(|| attr.get(3)) else {
                    continue;
                };
                let value = attrs.start() + value.start()..attrs.start() + value.end();
                match key.as_str() {
                    "Include" => name = Some(unescape(&source[value])),
                    "Version" => {
                        version = Some(VersionSite::Attribute {
                            attribute: attrs.start() + full.start()..attrs.start() + full.end(),
                            value,
                        })
                    }
                    _ => {}
                }
            }

            // Update/Remove items modify references declared elsewhere.
            let Some(name) = name else { continue };

            if version.is_none() {
                if let Some(body) = caps.get(2) {
                    if let Some(child) = VERSION_ELEMENT.captures(body.as_str()) {
                        if let (Some(el), Some(value)) = (child.get(0), child.get(1)) {
                            let start = body.start() + value.start();
                            version = Some(VersionSite::Child {
                                element: body.start() + el.start()..body.start() + el.end(),
                                value: trimmed(source, start..start + value.len()),
                            });
                        }
                    }
                }
            }

            let attributes_end = attrs.start() + attrs.as_str().trim_end().len();
            let group = item_groups
                .iter()
                .position(|g| g.body.contains(&whole.start()));

            references.push(ReferenceElement {
                span: whole.range(),
                name,
                version,
                attributes_end,
                group,
            });
        }

        Ok(Scan {
            version,
            references,
            item_groups,
            project_close,
        })
    }
}

/// Replaces comments, CDATA sections and processing instructions with spaces
/// of the same byte length.
fn mask_ignored(source: &str) -> String {
    let mut masked = String::with_capacity(source.len());
    let mut cursor = 0;
    for m in COMMENT.find_iter(source) {
        masked.push_str(&source[cursor..m.start()]);
        masked.extend(std::iter::repeat_n(' ', m.len()));
        cursor = m.end();
    }
    masked.push_str(&source[cursor..]);
    masked
}

/// Checks tag balance and the `<Project>` root, returning the offset of the
/// closing `</Project>` tag. `source` must already be masked.
fn check_well_formed(source: &str) -> Result<usize, String> {
    let mut stack: Vec<&str> = Vec::new();
    let mut root_seen = false;
    let mut project_close = None;

    for caps in TAG.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let closing = caps.get(1).is_some_and(|m| !m.is_empty());
        let self_closing = caps.get(4).is_some_and(|m| !m.is_empty());
        let line = line_number(source, whole.start());

        if project_close.is_some() {
            return Err(format!(
                "unexpected <{}> after </Project> at line {}",
                name.as_str(),
                line
            ));
        }

        if closing {
            match stack.pop() {
                Some(open) if open == name.as_str() => {
                    if stack.is_empty() {
                        project_close = Some(whole.start());
                    }
                }
                Some(open) => {
                    return Err(format!(
                        "mismatched </{}> at line {}, expected </{}>",
                        name.as_str(),
                        line,
                        open
                    ));
                }
                None => {
                    return Err(format!(
                        "unexpected </{}> at line {}",
                        name.as_str(),
                        line
                    ));
                }
            }
            continue;
        }

        if !root_seen {
            if name.as_str() != "Project" {
                return Err(format!(
                    "root element must be <Project>, found <{}>",
                    name.as_str()
                ));
            }
            root_seen = true;
        }
        if self_closing {
            if stack.is_empty() {
                return Err("root <Project> element is empty".to_string());
            }
        } else {
            stack.push(name.as_str());
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed <{}>", open));
    }
    project_close.ok_or_else(|| "no <Project> root element".to_string())
}

fn version_edit(
    source: &str,
    el: &ReferenceElement,
    wanted: Option<&str>,
) -> Option<(Range<usize>, String)> {
    match (&el.version, wanted) {
        (Some(site), Some(wanted)) => {
            let value = site.value();
            (unescape(&source[value.clone()]) != wanted).then(|| (value, escape(wanted)))
        }
        (Some(VersionSite::Attribute { attribute, .. }), None) => {
            Some((attribute.clone(), String::new()))
        }
        (Some(VersionSite::Child { element, .. }), None) => {
            Some((line_span(source, element.clone()), String::new()))
        }
        (None, Some(wanted)) => Some((
            el.attributes_end..el.attributes_end,
            format!(r#" Version="{}""#, escape(wanted)),
        )),
        (None, None) => None,
    }
}

fn insertion(
    source: &str,
    scan: &Scan,
    target: Option<&ReferenceElement>,
    added: &[DependencyReference],
    newline: &str,
) -> (Range<usize>, String) {
    let anchor = target.and_then(|t| {
        t.group
            .and_then(|g| scan.item_groups.get(g))
            .map(|group| (t, group))
    });
    if let Some((target, group)) = anchor {
        let indent = indentation(source, target.span.start);
        let close = group.body.end;
        let mut text = String::new();
        for reference in added {
            text.push_str(indent);
            text.push_str(&render(reference));
            text.push_str(newline);
        }
        let start = line_start(source, close);
        return if source[start..close].trim().is_empty() {
            (start..start, text)
        } else {
            (close..close, format!("{}{}", newline, text))
        };
    }

    let unit = indent_unit(source);
    let mut text = format!("{}<ItemGroup>{}", unit, newline);
    for reference in added {
        text.push_str(&format!(
            "{}{}{}{}",
            unit,
            unit,
            render(reference),
            newline
        ));
    }
    text.push_str(&format!("{}</ItemGroup>{}", unit, newline));

    let close = scan.project_close;
    let start = line_start(source, close);
    if source[start..close].trim().is_empty() {
        (start..start, text)
    } else {
        (close..close, format!("{}{}", newline, text))
    }
}

fn render(reference: &DependencyReference) -> String {
    match &reference.version {
        Some(version) => format!(
            r#"<PackageReference Include="{}" Version="{}" />"#,
            escape(&reference.name),
            escape(version)
        ),
        None => format!(
            r#"<PackageReference Include="{}" />"#,
            escape(&reference.name)
        ),
    }
}

/// Whether `body` is blank once the `removed` ranges are cut out of it.
fn only_whitespace_left(body: &str, offset: usize, removed: &[Range<usize>]) -> bool {
    let mut cursor = 0;
    let mut rest = String::new();
    for range in removed {
        rest.push_str(&body[cursor..range.start - offset]);
        cursor = range.end - offset;
    }
    rest.push_str(&body[cursor..]);
    rest.trim().is_empty()
}

/// Widens `span` to whole lines when nothing else shares them.
fn line_span(source: &str, span: Range<usize>) -> Range<usize> {
    let start = line_start(source, span.start);
    let end = source[span.end..]
        .find('\n')
        .map(|i| span.end + i + 1)
        .unwrap_or(source.len());
    if source[start..span.start].trim().is_empty() && source[span.end..end].trim().is_empty() {
        start..end
    } else {
        span
    }
}

fn line_start(source: &str, pos: usize) -> usize {
    source[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn line_number(source: &str, pos: usize) -> usize {
    source[..pos].matches('\n').count() + 1
}

fn indentation(source: &str, pos: usize) -> &str {
    let start = line_start(source, pos);
    let line = &source[start..];
    let len = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..len]
}

/// Indentation of the first indented line, two spaces by default.
fn indent_unit(source: &str) -> &str {
    source
        .lines()
        .map(|line| &line[..line.len() - line.trim_start_matches([' ', '\t']).len()])
        .find(|indent| !indent.is_empty())
        .unwrap_or("  ")
}

fn trimmed(source: &str, range: Range<usize>) -> Range<usize> {
    let text = &source[range.clone()];
    let start = range.start + (text.len() - text.trim_start().len());
    let end = range.start + text.trim_end().len();
    start..end.max(start)
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOL_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <TargetFramework>net6.0</TargetFramework>
    <PackAsTool>true</PackAsTool>
    <Version>1.2.3</Version>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include="Foo.Bar" Version="1.0.0" />
    <PackageReference Include="Other.Lib">
      <Version>2.0.0</Version>
    </PackageReference>
  </ItemGroup>

</Project>
"#;

    const BARE_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <Version>0.1.0</Version>
  </PropertyGroup>
</Project>
"#;

    #[test]
    fn test_decode_both_reference_forms() {
        let manifest = decode(TOOL_PROJECT).unwrap();
        assert_eq!(manifest.version, "1.2.3");
        assert_eq!(
            manifest.references,
            vec![
                DependencyReference::new("Foo.Bar", Some("1.0.0".into())),
                DependencyReference::new("Other.Lib", Some("2.0.0".into())),
            ]
        );
    }

    #[test]
    fn test_decode_ignores_comments_and_update_items() {
        let source = r#"<Project>
  <!-- <PropertyGroup><Version>9.9.9</Version></PropertyGroup> -->
  <PropertyGroup>
    <Version>3.0.0</Version>
  </PropertyGroup>
  <ItemGroup>
    <!-- <PackageReference Include="Commented.Out" Version="1.0.0" /> -->
    <PackageReference Update="Updated.Elsewhere" Version="1.0.0" />
    <PackageReference Include="Central.Managed" />
  </ItemGroup>
</Project>"#;
        let manifest = decode(source).unwrap();
        assert_eq!(manifest.version, "3.0.0");
        assert_eq!(
            manifest.references,
            vec![DependencyReference::new("Central.Managed", None)]
        );
    }

    #[test]
    fn test_decode_last_version_property_wins() {
        let source = r#"<Project>
  <PropertyGroup><Version>1.0.0</Version></PropertyGroup>
  <PropertyGroup><Version> 1.5.0 </Version></PropertyGroup>
</Project>"#;
        assert_eq!(decode(source).unwrap().version, "1.5.0");
    }

    const COMMENTED_TAGS: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <!-- settings live in the <PropertyGroup> below -->
  <PropertyGroup>
    <Version>1.2.3</Version>
  </PropertyGroup>
  <!-- references go in the <ItemGroup> below -->
  <ItemGroup>
    <PackageReference Include="Foo.Bar" Version="1.0.0" />
  </ItemGroup>
</Project>
"#;

    #[test]
    fn test_decode_tag_names_inside_comments() {
        let manifest = decode(COMMENTED_TAGS).unwrap();
        assert_eq!(manifest.version, "1.2.3");
        assert_eq!(
            manifest.references,
            vec![DependencyReference::new("Foo.Bar", Some("1.0.0".into()))]
        );
    }

    #[test]
    fn test_encode_groups_survive_tag_names_inside_comments() {
        let mut manifest = decode(COMMENTED_TAGS).unwrap();
        manifest
            .references
            .push(DependencyReference::new("New.Lib", Some("*".into())));
        assert_eq!(
            encode(COMMENTED_TAGS, &manifest).unwrap(),
            COMMENTED_TAGS.replace(
                "Version=\"1.0.0\" />\n",
                "Version=\"1.0.0\" />\n    <PackageReference Include=\"New.Lib\" Version=\"*\" />\n"
            )
        );

        manifest.references.clear();
        assert_eq!(
            encode(COMMENTED_TAGS, &manifest).unwrap(),
            COMMENTED_TAGS.replace(
                "  <ItemGroup>\n    <PackageReference Include=\"Foo.Bar\" Version=\"1.0.0\" />\n  </ItemGroup>\n",
                ""
            )
        );
    }

    #[test]
    fn test_decode_conditional_version_property() {
        let source = r#"<Project>
  <PropertyGroup>
    <Version Condition="'$(Version)' == ''">1.2.3</Version>
  </PropertyGroup>
</Project>"#;
        let mut manifest = decode(source).unwrap();
        assert_eq!(manifest.version, "1.2.3");

        manifest.version = "1.2.4".into();
        assert_eq!(
            encode(source, &manifest).unwrap(),
            source.replace(">1.2.3<", ">1.2.4<")
        );
    }

    #[test]
    fn test_decode_skips_prefixed_version_properties() {
        let source = r#"<Project>
  <PropertyGroup>
    <Version>1.0.0</Version>
    <VersionPrefix>5.0.0</VersionPrefix>
  </PropertyGroup>
</Project>"#;
        assert_eq!(decode(source).unwrap().version, "1.0.0");
    }

    #[test]
    fn test_decode_single_quoted_and_escaped_attributes() {
        let source = r#"<Project>
  <PropertyGroup><Version>1.0.0</Version></PropertyGroup>
  <ItemGroup>
    <PackageReference Version='[1.0,2.0)' Include='A&amp;B' />
  </ItemGroup>
</Project>"#;
        let manifest = decode(source).unwrap();
        assert_eq!(
            manifest.references,
            vec![DependencyReference::new("A&B", Some("[1.0,2.0)".into()))]
        );
    }

    #[test]
    fn test_decode_rejects_malformed_documents() {
        let cases = [
            ("", "no <Project> root element"),
            ("<Project><PropertyGroup></Project>", "mismatched"),
            ("<Project><PropertyGroup>", "unclosed <PropertyGroup>"),
            ("<Package></Package>", "root element must be <Project>"),
            ("</Project>", "unexpected </Project>"),
            (
                "<Project><PropertyGroup><OutputType>Exe</OutputType></PropertyGroup></Project>",
                "missing <Version> property",
            ),
        ];
        for (source, expected) in cases {
            let err = decode(source).unwrap_err();
            assert!(
                err.contains(expected),
                "{:?}: expected '{}', got '{}'",
                source,
                expected,
                err
            );
        }
    }

    #[test]
    fn test_encode_unchanged_is_identity() {
        let manifest = decode(TOOL_PROJECT).unwrap();
        assert_eq!(encode(TOOL_PROJECT, &manifest).unwrap(), TOOL_PROJECT);
    }

    #[test]
    fn test_encode_version_only_touches_version_text() {
        let mut manifest = decode(TOOL_PROJECT).unwrap();
        manifest.version = "1.2.4".into();
        let output = encode(TOOL_PROJECT, &manifest).unwrap();
        assert_eq!(output, TOOL_PROJECT.replace("1.2.3", "1.2.4"));
    }

    #[test]
    fn test_encode_appends_into_existing_group() {
        let mut manifest = decode(TOOL_PROJECT).unwrap();
        manifest
            .references
            .push(DependencyReference::wildcard("Nuke.Common"));
        let output = encode(TOOL_PROJECT, &manifest).unwrap();

        let expected = TOOL_PROJECT.replace(
            "    </PackageReference>\n  </ItemGroup>",
            "    </PackageReference>\n    <PackageReference Include=\"Nuke.Common\" Version=\"*\" />\n  </ItemGroup>",
        );
        assert_eq!(output, expected);
        assert_eq!(decode(&output).unwrap(), manifest);
    }

    #[test]
    fn test_encode_removes_element_with_its_line() {
        let mut manifest = decode(TOOL_PROJECT).unwrap();
        manifest.remove_reference("Foo.Bar");
        let output = encode(TOOL_PROJECT, &manifest).unwrap();

        assert_eq!(
            output,
            TOOL_PROJECT.replace(
                "    <PackageReference Include=\"Foo.Bar\" Version=\"1.0.0\" />\n",
                ""
            )
        );
    }

    #[test]
    fn test_encode_removes_emptied_group() {
        let mut manifest = decode(TOOL_PROJECT).unwrap();
        manifest.references.clear();
        let output = encode(TOOL_PROJECT, &manifest).unwrap();

        assert!(!output.contains("ItemGroup"), "{}", output);
        assert!(!output.contains("PackageReference"), "{}", output);
        assert_eq!(decode(&output).unwrap(), manifest);
    }

    #[test]
    fn test_encode_creates_group_before_project_close() {
        let mut manifest = decode(BARE_PROJECT).unwrap();
        manifest
            .references
            .push(DependencyReference::wildcard("Nuke.Common"));
        let output = encode(BARE_PROJECT, &manifest).unwrap();

        assert_eq!(
            output,
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <Version>0.1.0</Version>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Nuke.Common" Version="*" />
  </ItemGroup>
</Project>
"#
        );

        // Removing it again restores the original document.
        manifest.references.clear();
        assert_eq!(encode(&output, &manifest).unwrap(), BARE_PROJECT);
    }

    #[test]
    fn test_encode_keeps_group_with_other_items() {
        let source = r#"<Project>
  <PropertyGroup><Version>1.0.0</Version></PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Nuke.Common" Version="*" />
    <None Include="README.md" Pack="true" />
  </ItemGroup>
</Project>
"#;
        let mut manifest = decode(source).unwrap();
        manifest.references.clear();
        let output = encode(source, &manifest).unwrap();

        assert!(output.contains("<ItemGroup>"));
        assert!(output.contains(r#"<None Include="README.md" Pack="true" />"#));
        assert!(!output.contains("Nuke.Common"));
    }

    #[test]
    fn test_encode_preserves_crlf() {
        let source = BARE_PROJECT.replace('\n', "\r\n");
        let mut manifest = decode(&source).unwrap();
        manifest.references.push(DependencyReference::wildcard("A"));
        let output = encode(&source, &manifest).unwrap();

        assert!(output.contains("<ItemGroup>\r\n"));
        assert!(!output.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_encode_updates_surviving_constraints() {
        let mut manifest = decode(TOOL_PROJECT).unwrap();
        manifest.references[0].version = Some("1.1.0".into());
        manifest.references[1].version = Some("2.1.0".into());
        let output = encode(TOOL_PROJECT, &manifest).unwrap();

        assert!(output.contains(r#"Include="Foo.Bar" Version="1.1.0""#));
        assert!(output.contains("<Version>2.1.0</Version>"));
        assert_eq!(decode(&output).unwrap(), manifest);
    }

    #[test]
    fn test_encode_escapes_names() {
        let mut manifest = decode(BARE_PROJECT).unwrap();
        manifest
            .references
            .push(DependencyReference::wildcard("A\"B"));
        let output = encode(BARE_PROJECT, &manifest).unwrap();

        assert!(output.contains(r#"Include="A&quot;B""#));
        assert_eq!(decode(&output).unwrap(), manifest);
    }
}
