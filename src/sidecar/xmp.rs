//! XMP packet rendering for Eagle annotations and tags.
//!
//! The packet carries the annotation as `dc:description` and the tags twice,
//! as a `dc:subject` bag and a digiKam `TagsList` sequence, which is what
//! Lightroom, digiKam and Immich read back.

use crate::catalog::MetadataRecord;
use std::path::{Path, PathBuf};

const PACKET_BEGIN: &str = "<?xpacket begin='\u{feff}' id='W5M0MpCehiHzreSzNTczkc9d'?>";
const PACKET_END: &str = "<?xpacket end='w'?>";

/// XML-escape text content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Sidecar location for an asset: same path with the extension replaced by `xmp`.
pub fn sidecar_path(asset: &Path) -> PathBuf {
    asset.with_extension("xmp")
}

pub fn render_xmp(metadata: &MetadataRecord) -> String {
    let mut lines: Vec<String> = vec![
        PACKET_BEGIN.to_string(),
        r#"<x:xmpmeta xmlns:x="adobe:ns:meta/" x:xmptk="eaglebridge">"#.to_string(),
        r#" <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">"#.to_string(),
        r#"  <rdf:Description rdf:about="""#.to_string(),
        r#"    xmlns:dc="http://purl.org/dc/elements/1.1/""#.to_string(),
        r#"    xmlns:digiKam="http://www.digikam.org/ns/1.0/">"#.to_string(),
    ];

    if !metadata.annotation.is_empty() {
        lines.push("   <dc:description>".to_string());
        lines.push("    <rdf:Alt>".to_string());
        lines.push(format!(
            r#"     <rdf:li xml:lang="x-default">{}</rdf:li>"#,
            escape(&metadata.annotation)
        ));
        lines.push("    </rdf:Alt>".to_string());
        lines.push("   </dc:description>".to_string());
    }

    if !metadata.tags.is_empty() {
        push_tag_list(&mut lines, "dc:subject", "rdf:Bag", &metadata.tags);
        push_tag_list(&mut lines, "digiKam:TagsList", "rdf:Seq", &metadata.tags);
    }

    lines.push("  </rdf:Description>".to_string());
    lines.push(" </rdf:RDF>".to_string());
    lines.push("</x:xmpmeta>".to_string());
    lines.push(PACKET_END.to_string());

    lines.join("\n")
}

fn push_tag_list(lines: &mut Vec<String>, element: &str, container: &str, tags: &[String]) {
    lines.push(format!("   <{}>", element));
    lines.push(format!("    <{}>", container));
    for tag in tags {
        lines.push(format!("     <rdf:li>{}</rdf:li>", escape(tag)));
    }
    lines.push(format!("    </{}>", container));
    lines.push(format!("   </{}>", element));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape(r#"<b>Tom & "Jerry's"</b>"#),
            "&lt;b&gt;Tom &amp; &quot;Jerry&apos;s&quot;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_sidecar_path_replaces_extension() {
        assert_eq!(
            sidecar_path(Path::new("/lib/images/X.info/photo.heic")),
            PathBuf::from("/lib/images/X.info/photo.xmp")
        );
        assert_eq!(
            sidecar_path(Path::new("/lib/images/X.info/README")),
            PathBuf::from("/lib/images/X.info/README.xmp")
        );
    }

    #[test]
    fn test_render_empty_record_has_no_optional_blocks() {
        let xmp = render_xmp(&MetadataRecord::new("ID1", "photo"));
        assert!(xmp.starts_with("<?xpacket begin="));
        assert!(xmp.ends_with("<?xpacket end='w'?>"));
        assert!(xmp.contains(r#"x:xmptk="eaglebridge""#));
        assert!(!xmp.contains("dc:description"));
        assert!(!xmp.contains("dc:subject"));
        assert!(!xmp.contains("digiKam:TagsList"));
    }

    #[test]
    fn test_render_annotation_and_tags() {
        let mut record = MetadataRecord::new("ID1", "photo");
        record.annotation = "Sunset <over> the bay & hills".to_string();
        record.tags = vec!["travel".to_string(), "R&D".to_string()];

        let xmp = render_xmp(&record);
        assert!(xmp.contains(
            r#"<rdf:li xml:lang="x-default">Sunset &lt;over&gt; the bay &amp; hills</rdf:li>"#
        ));
        assert!(xmp.contains("<rdf:Bag>"));
        assert!(xmp.contains("<rdf:Seq>"));
        assert_eq!(xmp.matches("<rdf:li>travel</rdf:li>").count(), 2);
        assert_eq!(xmp.matches("<rdf:li>R&amp;D</rdf:li>").count(), 2);
        assert!(!xmp.contains("R&D"));
    }
}
