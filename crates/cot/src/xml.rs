//! CoT XML serialization
//!
//! Emits the standard declaration line followed by the `<event>` document.
//! Attribute order matters to no receiver, but it is kept stable anyway so
//! output diffs stay readable.

use bytes::Bytes;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::event::{CotEvent, CotPoint, EVENT_VERSION, HOW_MACHINE_GENERATED};

/// Serialize a [`CotEvent`] to wire bytes.
pub fn serialize(event: &CotEvent) -> Result<Bytes, quick_xml::Error> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;

    let mut root = BytesStart::new("event");
    root.push_attribute(("version", EVENT_VERSION));
    root.push_attribute(("uid", event.uid.as_str()));
    root.push_attribute(("type", event.cot_type));
    root.push_attribute(("time", event.time.as_str()));
    root.push_attribute(("start", event.start.as_str()));
    root.push_attribute(("stale", event.stale.as_str()));
    root.push_attribute(("how", HOW_MACHINE_GENERATED));
    writer.write_event(Event::Start(root))?;

    write_point(&mut writer, &event.point)?;

    writer.write_event(Event::Start(BytesStart::new("detail")))?;

    let mut contact = BytesStart::new("contact");
    contact.push_attribute(("callsign", event.detail.callsign.as_str()));
    writer.write_event(Event::Empty(contact))?;

    writer.write_event(Event::Start(BytesStart::new("remarks")))?;
    writer.write_event(Event::Text(BytesText::new(&event.detail.remarks)))?;
    writer.write_event(Event::End(BytesEnd::new("remarks")))?;

    if let Some(track) = event.detail.track {
        let mut elem = BytesStart::new("track");
        elem.push_attribute(("course", fmt_num(track.course).as_str()));
        elem.push_attribute(("speed", fmt_num(track.speed).as_str()));
        writer.write_event(Event::Empty(elem))?;
    }

    if let Some(ref link) = event.detail.link {
        let mut elem = BytesStart::new("link");
        elem.push_attribute(("uid", link.uid.as_str()));
        elem.push_attribute(("type", link.link_type));
        elem.push_attribute(("relation", link.relation));
        writer.write_event(Event::Start(elem))?;
        write_point(&mut writer, &link.point)?;
        writer.write_event(Event::End(BytesEnd::new("link")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("detail")))?;
    writer.write_event(Event::End(BytesEnd::new("event")))?;

    Ok(Bytes::from(writer.into_inner()))
}

fn write_point(writer: &mut Writer<Vec<u8>>, point: &CotPoint) -> Result<(), quick_xml::Error> {
    let mut elem = BytesStart::new("point");
    elem.push_attribute(("lat", fmt_num(point.lat).as_str()));
    elem.push_attribute(("lon", fmt_num(point.lon).as_str()));
    elem.push_attribute(("hae", fmt_num(point.hae).as_str()));
    elem.push_attribute(("ce", fmt_num(point.ce).as_str()));
    elem.push_attribute(("le", fmt_num(point.le).as_str()));
    writer.write_event(Event::Empty(elem))
}

/// Shortest round-trippable decimal form: 90.0 -> "90", 5.5 -> "5.5".
fn fmt_num(v: f64) -> String {
    format!("{v}")
}
