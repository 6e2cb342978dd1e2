//! YouTube `timedtext` caption documents.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::video::captions::CaptionFragment;

const CUE_TAG: &[u8] = b"text";

/// Every `<text>` cue in document order, with timing when the attributes parse.
///
/// The track is read as XML, so a self-closing `<text/>` is an empty cue and
/// never swallows its siblings. Cue text is returned with one level of XML
/// escaping removed. Caption payloads are commonly escaped twice, so a second
/// pass with [`decode_caption_entities`] is still needed.
///
/// Malformed input ends the walk; cues read up to that point are kept.
pub fn parse_timed_text(xml: &str) -> Vec<CaptionFragment> {
    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    // the open cue and its still-escaped text
    let mut open: Option<(CaptionFragment, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) if tag.name().as_ref() == CUE_TAG => {
                open = Some((cue(&tag), String::new()));
            }
            Ok(Event::Empty(tag)) if tag.name().as_ref() == CUE_TAG => {
                fragments.push(cue(&tag));
            }
            Ok(Event::Text(text)) => {
                if let Some((_, raw)) = open.as_mut() {
                    raw.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Ok(Event::GeneralRef(reference)) => {
                if let Some((_, raw)) = open.as_mut() {
                    raw.push('&');
                    raw.push_str(&String::from_utf8_lossy(&reference));
                    raw.push(';');
                }
            }
            Ok(Event::End(tag)) if tag.name().as_ref() == CUE_TAG => {
                if let Some((mut fragment, raw)) = open.take() {
                    fragment.text = unescape_cue(raw);
                    fragments.push(fragment);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                debug!(error = %err, cues = fragments.len(), "malformed caption document");
                break;
            }
            _ => {}
        }
    }

    fragments
}

fn cue(tag: &BytesStart<'_>) -> CaptionFragment {
    let seconds = |name: &str| -> Option<f64> {
        let attr = tag.try_get_attribute(name).ok()??;
        std::str::from_utf8(&attr.value).ok()?.parse().ok()
    };

    CaptionFragment {
        text: String::new(),
        start: seconds("start"),
        duration: seconds("dur"),
    }
}

/// Unknown named entities leave the text as-is.
fn unescape_cue(raw: String) -> String {
    let decoded = unescape(&raw).map(|text| text.into_owned());
    decoded.unwrap_or(raw)
}

/// Decode the three entities left behind in caption text.
///
/// `&amp;` goes last so `&amp;quot;` becomes `&quot;` rather than `"`.
pub fn decode_caption_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Space-joined, entity-decoded, trimmed transcript of a timedtext document.
pub fn transcript_from_timed_text(xml: &str) -> String {
    let joined = parse_timed_text(xml)
        .into_iter()
        .map(|fragment| fragment.text)
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    decode_caption_entities(&joined).trim().to_string()
}
