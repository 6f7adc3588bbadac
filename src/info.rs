use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// Document metadata written into the PDF info dictionary
#[derive(Default, Debug, Clone)]
pub struct Info {
    /// The title of the document.
    pub title: Option<String>,
    /// The subject of the document.
    pub subject: Option<String>,
    /// When the document was made. Falls back to the time of writing if not set.
    pub created: Option<DateTime<FixedOffset>>,
}

impl Info {
    /// Create a new info block, with all metadata set to [None]
    pub fn new() -> Info {
        Info::default()
    }

    /// Metadata for a sheet of printable cards
    pub fn print_sheets(page_count: usize) -> Info {
        let mut info = Info::new();
        info.title("Tarot cards")
            .subject(format!("{page_count} printable A4 card sheets"));
        info
    }

    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Pin the creation date, e.g. to make the output reproducible
    pub fn created(&mut self, created: DateTime<FixedOffset>) -> &mut Self {
        self.created = Some(created);
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.alloc(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        let created = self
            .created
            .unwrap_or_else(|| Local::now().fixed_offset());
        info.creation_date(pdf_date(&created));
    }
}

fn pdf_date(when: &DateTime<FixedOffset>) -> PDate {
    let offset = when.offset().local_minus_utc();
    let offset_hours = offset / (60 * 60);
    let offset_minutes = ((offset - (offset_hours * (60 * 60))) / 60).abs();
    PDate::new(when.year() as u16)
        .month(when.month() as u8)
        .day(when.day() as u8)
        .hour(when.hour() as u8)
        .minute(when.minute() as u8)
        .second(when.second() as u8)
        .utc_offset_hour(offset_hours as i8)
        .utc_offset_minute(offset_minutes as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use chrono::TimeZone;
    use image::RgbImage;

    fn render(info: Info) -> Vec<u8> {
        let mut doc = Document::default();
        doc.set_info(info);
        doc.add_raster_page(RgbImage::new(4, 4), 72.0);
        doc.render().expect("renders")
    }

    #[test]
    fn pinned_creation_date_makes_output_reproducible() {
        let created = FixedOffset::east_opt(3600)
            .and_then(|tz| tz.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single())
            .expect("valid date");
        let mut info = Info::print_sheets(1);
        info.created(created);

        let first = render(info.clone());
        let second = render(info);
        assert_eq!(first, second);

        let needle = b"D:20240102030405+01";
        assert!(first.windows(needle.len()).any(|w| w == needle));
    }
}
