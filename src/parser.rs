//! Decoder for the `;`-delimited TAM real-time CSV feed.

use chrono::{NaiveDateTime, NaiveTime};
use csv::StringRecord;
use tracing::debug;

use crate::error::DecodeError;
use crate::model::{LineId, StopRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Course,
    StopCode,
    StopId,
    RouteShortName,
    TripHeadsign,
    DirectionId,
    DepartureTime,
    IsTheoretical,
    DelaySec,
    DestArCode,
}

const FIELD_COUNT: usize = 10;

impl Field {
    const ALL: [Field; FIELD_COUNT] = [
        Field::Course,
        Field::StopCode,
        Field::StopId,
        Field::RouteShortName,
        Field::TripHeadsign,
        Field::DirectionId,
        Field::DepartureTime,
        Field::IsTheoretical,
        Field::DelaySec,
        Field::DestArCode,
    ];

    /// Column name used in error messages.
    fn column(self) -> &'static str {
        FIELD_MAP
            .iter()
            .find(|(_, field)| *field == self)
            .map_or("?", |(column, _)| *column)
    }
}

/// Feed column names and the record field each one fills.
///
/// Header names match case-insensitively. The first name listed for a field
/// is the one reported when it is missing. Columns absent from this table are
/// ignored.
const FIELD_MAP: &[(&str, Field)] = &[
    ("course", Field::Course),
    ("stop_code", Field::StopCode),
    ("stop_id", Field::StopId),
    ("route_short_name", Field::RouteShortName),
    ("trip_headsign", Field::TripHeadsign),
    ("direction_id", Field::DirectionId),
    ("departure_time", Field::DepartureTime),
    ("is_theorical", Field::IsTheoretical),
    ("delay_sec", Field::DelaySec),
    ("dest_arr_code", Field::DestArCode),
    ("dest_a_r_code", Field::DestArCode),
];

/// Decodes the whole feed into typed records, in row order.
///
/// # Errors
///
/// Fails on the first missing column, malformed row or unparsable cell.
/// No partial result is returned.
pub fn decode_feed(text: &str) -> Result<Vec<StopRecord>, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns = index_columns(reader.headers()?)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = Row {
            line: record.position().map_or(0, |pos| pos.line()),
            record: &record,
            columns: &columns,
        };
        records.push(row.decode()?);
    }

    debug!(records = records.len(), "Feed decoded");
    Ok(records)
}

/// Resolves each field to its column position using [`FIELD_MAP`].
fn index_columns(headers: &StringRecord) -> Result<[usize; FIELD_COUNT], DecodeError> {
    let mut found = [None; FIELD_COUNT];
    for (position, name) in headers.iter().enumerate() {
        let name = name.trim_start_matches('\u{feff}').trim();
        let matched = FIELD_MAP
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name));
        if let Some((_, field)) = matched {
            let slot = &mut found[*field as usize];
            if slot.is_none() {
                *slot = Some(position);
            }
        }
    }

    let mut columns = [0; FIELD_COUNT];
    for field in Field::ALL {
        columns[field as usize] = found[field as usize].ok_or(DecodeError::MissingColumn {
            column: field.column(),
        })?;
    }
    Ok(columns)
}

struct Row<'a> {
    line: u64,
    record: &'a StringRecord,
    columns: &'a [usize; FIELD_COUNT],
}

impl Row<'_> {
    fn decode(&self) -> Result<StopRecord, DecodeError> {
        let stop_code = self.text(Field::StopCode).trim();
        Ok(StopRecord {
            course: self.text(Field::Course).to_string(),
            stop_code: (!stop_code.is_empty()).then(|| stop_code.to_string()),
            stop_id: self.int(Field::StopId)?,
            route_short_name: LineId::new(self.text(Field::RouteShortName)),
            trip_headsign: self.text(Field::TripHeadsign).to_string(),
            direction_id: self.int(Field::DirectionId)?,
            departure_time: self.parse(Field::DepartureTime, parse_departure_time)?,
            is_theoretical: self.parse(Field::IsTheoretical, parse_flag)?,
            delay_sec: self.int(Field::DelaySec)?,
            dest_ar_code: self.int(Field::DestArCode)?,
        })
    }

    fn text(&self, field: Field) -> &str {
        self.record
            .get(self.columns[field as usize])
            .unwrap_or_default()
    }

    fn int(&self, field: Field) -> Result<i64, DecodeError> {
        self.parse(field, |value| value.parse().ok())
    }

    fn parse<T>(&self, field: Field, convert: impl Fn(&str) -> Option<T>) -> Result<T, DecodeError> {
        let value = self.text(field).trim();
        convert(value).ok_or_else(|| DecodeError::InvalidField {
            line: self.line,
            column: field.column(),
            value: value.to_string(),
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Accepts `HH:MM[:SS]` or a full `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// Only the time of day is kept: hours past 23 wrap and the day rollover is
/// dropped, so `24:05:00` becomes `00:05:00`.
fn parse_departure_time(value: &str) -> Option<NaiveTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.time());
    }

    let mut parts = value.split(':');
    let hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = parts.next()?.parse().ok()?;
    let seconds: u32 = match parts.next() {
        Some(seconds) => seconds.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hours % 24, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "course;stop_code;stop_id;stop_name;route_short_name;trip_headsign;direction_id;is_theorical;departure_time;delay_sec;dest_arr_code";

    fn feed(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    #[test]
    fn test_decode_typed_record() {
        let text = feed(&["52016;PMARIRTW;1417;Place Carnot;1;Odysseum;0;0;14:32:10;120;3"]);
        let records = decode_feed(&text).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.course, "52016");
        assert_eq!(record.stop_code.as_deref(), Some("PMARIRTW"));
        assert_eq!(record.stop_id, 1417);
        assert_eq!(record.route_short_name, LineId::from(1));
        assert_eq!(record.trip_headsign, "Odysseum");
        assert_eq!(record.direction_id, 0);
        assert_eq!(
            record.departure_time,
            NaiveTime::from_hms_opt(14, 32, 10).unwrap()
        );
        assert!(!record.is_theoretical);
        assert_eq!(record.delay_sec, 120);
        assert_eq!(record.dest_ar_code, 3);
    }

    #[test]
    fn test_decode_keeps_row_order() {
        let text = feed(&[
            "c1;A;1;x;1;First;0;0;10:00:00;300;1",
            "c2;B;2;x;3;Second;1;1;10:01:00;60;2",
            "c3;C;3;x;4;Third;0;0;10:02:00;0;3",
        ]);
        let courses: Vec<_> = decode_feed(&text)
            .unwrap()
            .into_iter()
            .map(|record| record.course)
            .collect();
        assert_eq!(courses, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_decode_header_only() {
        assert!(decode_feed(&feed(&[])).unwrap().is_empty());
    }

    #[test]
    fn test_empty_stop_code_is_absent() {
        let text = feed(&["c1;;1;x;1;Mosson;0;1;10:00:00;60;1"]);
        let records = decode_feed(&text).unwrap();
        assert_eq!(records[0].stop_code, None);
        assert!(records[0].is_theoretical);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let text = "delay_sec;trip_headsign;course;stop_code;stop_id;route_short_name;direction_id;is_theorical;departure_time;dest_a_r_code\n\
                    45;Mosson;c9;PMARIATW;7;3;1;true;08:05;11\n";
        let records = decode_feed(text).unwrap();
        assert_eq!(records[0].delay_sec, 45);
        assert_eq!(records[0].trip_headsign, "Mosson");
        assert_eq!(records[0].route_short_name, LineId::from(3));
        assert_eq!(records[0].dest_ar_code, 11);
        assert_eq!(
            records[0].departure_time,
            NaiveTime::from_hms_opt(8, 5, 0).unwrap()
        );
    }

    #[test]
    fn test_header_names_ignore_case() {
        let text = "course;stop_code;stop_id;stop_name;route_short_name;trip_headsign;direction_id;is_theorical;departure_time;delay_sec;dest_arR_code\n\
                    c1;PMARIRTW;1;x;1;Mosson;0;0;10:00:00;60;7\n";
        let records = decode_feed(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dest_ar_code, 7);

        let shouted = "COURSE;STOP_CODE;STOP_ID;ROUTE_SHORT_NAME;TRIP_HEADSIGN;DIRECTION_ID;IS_THEORICAL;DEPARTURE_TIME;DELAY_SEC;DEST_ARR_CODE\n\
                       c2;PMARIATW;2;3;Juvignac;1;1;10:05:00;90;8\n";
        let records = decode_feed(shouted).unwrap();
        assert_eq!(records[0].stop_code.as_deref(), Some("PMARIATW"));
        assert_eq!(records[0].dest_ar_code, 8);
    }

    #[test]
    fn test_byte_order_mark_on_header() {
        let text = format!("\u{feff}{}", feed(&["c1;A;1;x;1;Mosson;0;0;10:00:00;60;1"]));
        assert_eq!(decode_feed(&text).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_column_fails() {
        let text = "course;stop_code;stop_id\nc1;A;1\n";
        match decode_feed(text) {
            Err(DecodeError::MissingColumn { column }) => assert_eq!(column, "route_short_name"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_fails() {
        assert!(matches!(
            decode_feed(""),
            Err(DecodeError::MissingColumn { column: "course" })
        ));
    }

    #[test]
    fn test_wrong_column_count_fails_whole_decode() {
        let text = feed(&[
            "c1;A;1;x;1;Mosson;0;0;10:00:00;60;1",
            "c2;A;1;x;1;Mosson;0;0;10:00:00",
        ]);
        assert!(matches!(decode_feed(&text), Err(DecodeError::Csv { .. })));
    }

    #[test]
    fn test_unparsable_number_fails_whole_decode() {
        let text = feed(&[
            "c1;A;1;x;1;Mosson;0;0;10:00:00;60;1",
            "c2;A;1;x;1;Mosson;0;0;10:00:00;soon;1",
        ]);
        match decode_feed(&text) {
            Err(DecodeError::InvalidField {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "delay_sec");
                assert_eq!(value, "soon");
            }
            other => panic!("expected invalid field, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_number_is_an_error() {
        let text = feed(&["c1;A;;x;1;Mosson;0;0;10:00:00;60;1"]);
        assert!(matches!(
            decode_feed(&text),
            Err(DecodeError::InvalidField {
                column: "stop_id",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_flag_is_an_error() {
        let text = feed(&["c1;A;1;x;1;Mosson;0;maybe;10:00:00;60;1"]);
        assert!(matches!(
            decode_feed(&text),
            Err(DecodeError::InvalidField {
                column: "is_theorical",
                ..
            })
        ));
    }

    #[test]
    fn test_stop_code_and_delay_reproduce_source_text() {
        let text = feed(&[
            "c1;PMARIRTW;1;x;1;Mosson;0;0;10:00:00;-45;1",
            "c2;PMARIATW;1;x;1;Mosson;0;0;10:00:00;86400;1",
        ]);
        let records = decode_feed(&text).unwrap();
        assert_eq!(records[0].stop_code.as_deref(), Some("PMARIRTW"));
        assert_eq!(records[0].delay_sec.to_string(), "-45");
        assert_eq!(records[1].stop_code.as_deref(), Some("PMARIATW"));
        assert_eq!(records[1].delay_sec.to_string(), "86400");
    }

    #[test]
    fn test_departure_time_formats() {
        assert_eq!(
            parse_departure_time("24:10:00"),
            NaiveTime::from_hms_opt(0, 10, 0)
        );
        assert_eq!(
            parse_departure_time("2024-03-01 07:15:30"),
            NaiveTime::from_hms_opt(7, 15, 30)
        );
        assert_eq!(parse_departure_time("7h15"), None);
        assert_eq!(parse_departure_time("10:00:00:00"), None);
        assert_eq!(parse_departure_time("10:61:00"), None);
    }
}
