use crate::reader::{self, FieldReader};
use crate::types::*;

/// Parse a single record from the reader.
///
/// Reads one complete record (header + body) from the stream and decodes the
/// body against the schema the header names. Returns
/// `ParseError::EndOfStream` when there are no more records.
pub fn parse_record(
    reader: &mut impl std::io::Read,
    schemas: &SchemaTable,
    time_anchor: &TimeAnchor,
) -> Result<ParsedRecord, ParseError> {
    let header = reader::read_header(reader)?;
    let body = reader::read_body(reader, header.data_len)?;

    let spec = schemas
        .get(header.schema_id)
        .ok_or(ParseError::UnknownSchema(header.schema_id))?;

    let mut r = FieldReader::new(&body);
    let mut fields = Vec::with_capacity(spec.fields.len());
    for field in &spec.fields {
        fields.push((field.name.clone(), decode_field(&mut r, field.ty)));
    }

    if r.has_error() {
        return Err(ParseError::UnexpectedEof);
    }
    if !r.at_end() {
        return Err(ParseError::InvalidData(format!(
            "{} trailing bytes after {}:{} fields",
            body.len() - r.bytes_read(),
            spec.provider,
            spec.event,
        )));
    }

    Ok(ParsedRecord {
        schema_id: header.schema_id,
        event_id: header.event_id,
        event_time: time_anchor.to_real(header.nanotime),
        provider: spec.provider.clone(),
        event: spec.event.clone(),
        fields,
    })
}

fn decode_field(r: &mut FieldReader<'_>, ty: FieldType) -> FieldValue {
    match ty {
        FieldType::U8 => FieldValue::Uint(r.uint_width(1)),
        FieldType::U16 => FieldValue::Uint(r.uint_width(2)),
        FieldType::U32 => FieldValue::Uint(r.uint_width(4)),
        FieldType::U64 => FieldValue::Uint(r.uint_width(8)),
        FieldType::I8 => FieldValue::Int(r.int_width(1)),
        FieldType::I16 => FieldValue::Int(r.int_width(2)),
        FieldType::I32 => FieldValue::Int(r.int_width(4)),
        FieldType::I64 => FieldValue::Int(r.int_width(8)),
        FieldType::StrLengthPrefixed => FieldValue::Str(r.string()),
        FieldType::StrNullTerminated => FieldValue::Str(r.cstring()),
    }
}
