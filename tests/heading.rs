use std::io::Read;

use dsv_stream::{Error, ReadOptions, Reader};

fn collect<R: Read>(reader: &mut Reader<R>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    reader
        .read_all(|row| {
            rows.push(
                row.iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect(),
            );
        })
        .expect("read_all failed");
    rows
}

fn skip_heading(fields: usize) -> ReadOptions {
    ReadOptions::new().with_fields(fields).with_skip_heading(true)
}

#[test]
fn infers_field_count_from_heading() {
    let input = "A|B|C|D|E\n1|2|3|4|5\n6|7|8|9|10\n";
    let mut reader = Reader::with_options(input.as_bytes(), skip_heading(0));
    let rows = collect(&mut reader);
    assert_eq!(reader.fields(), 5);
    assert_eq!(
        rows,
        [vec!["1", "2", "3", "4", "5"], vec!["6", "7", "8", "9", "10"]]
    );
}

#[test]
fn inferred_count_is_enforced_on_later_rows() {
    let input = "A|B|C|D|E\n1|2|3|4|5|6\n";
    let mut reader = Reader::with_options(input.as_bytes(), skip_heading(0));
    let err = reader.read_row().unwrap_err();
    assert!(matches!(
        err,
        Error::FieldOverflow {
            row: 1,
            expected: 5,
            found: 6
        }
    ));
}

#[test]
fn heading_names_are_exposed() {
    let input = "A|B|C\nstr1|123|str2\n";
    let mut reader = Reader::with_options(input.as_bytes(), skip_heading(3));
    let rows = collect(&mut reader);
    assert_eq!(rows, [vec!["str1", "123", "str2"]]);
    let names: Vec<&str> = reader
        .headings()
        .expect("headings")
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[test]
fn heading_must_match_configured_count() {
    let input = "A|B|C|D\n1|2|3\n";
    let mut reader = Reader::with_options(input.as_bytes(), skip_heading(3));
    let err = reader.read_row().unwrap_err();
    assert!(matches!(
        err,
        Error::HeadingMismatch {
            expected: 3,
            found: 4
        }
    ));
}

#[test]
fn heading_skipped_with_no_trailing_newline_on_last_row() {
    let input = "A|B|C\nstr1|123|str2\nstr3|456|str\"4";
    let mut reader = Reader::with_options(input.as_bytes(), skip_heading(3));
    let rows = collect(&mut reader);
    assert_eq!(
        rows,
        [vec!["str1", "123", "str2"], vec!["str3", "456", "str\"4"]]
    );
}

#[test]
fn heading_only_input_yields_no_rows() {
    let mut reader = Reader::with_options("A|B|C".as_bytes(), skip_heading(0));
    assert!(reader.read_row().unwrap().is_none());
    assert_eq!(reader.fields(), 3);
    assert_eq!(reader.rows_read(), 0);
}

#[test]
fn empty_input_cannot_infer() {
    let mut reader = Reader::with_options("".as_bytes(), skip_heading(0));
    let err = reader.read_row().unwrap_err();
    assert!(matches!(err, Error::UnsetFieldCount));
}

#[test]
fn empty_input_with_explicit_count_is_clean() {
    let mut reader = Reader::with_options("".as_bytes(), skip_heading(3));
    assert!(reader.read_row().unwrap().is_none());
    assert!(reader.headings().is_none());
}

#[test]
fn crlf_heading_is_trimmed() {
    let input = "A|B\r\n1|2\r\n";
    let mut reader = Reader::with_options(input.as_bytes(), skip_heading(0));
    let rows = collect(&mut reader);
    assert_eq!(rows, [vec!["1", "2"]]);
    let names: Vec<&str> = reader
        .headings()
        .expect("headings")
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(names, ["A", "B"]);
}

#[test]
fn wide_heading_with_data_ported_from_reference_file() {
    let input = "CrNumber|CrPeriod|CrCarBonusID|CrCBExecID|CrCBRepayment|CrCBRepaymentFee|CrCBBonusEligibl|CrCBBonusAmount|CrCBCommitted|CrCBNotes|CrCBScheme|CrCBSpareC2|CrCBBalance|CrCBSpareNum1|CrCBSpareNum2|CrCBSpareDate1|CrCBSpareDate2\n\
                 328|2015/09|1097684|006308|Yes|-150|Yes|0|2015-09-11||Scheme3||4750|0|0|1899-12-30|1899-12-30\n\
                 376|2017/11|9876543|789012|Yes|-150|Yes|0|2017-11-13||Scheme3||99999|0|0|1899-12-30|1899-12-30";
    let mut reader = Reader::with_options(input.as_bytes(), skip_heading(17));
    let rows = collect(&mut reader);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "328");
    assert_eq!(rows[1][12], "99999");
    assert_eq!(reader.headings().expect("headings").len(), 17);
}
