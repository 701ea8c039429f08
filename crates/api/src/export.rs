//! Flat CSV views over all loaded annotations.

use anyhow::{Context, Result};
use schema::Document;

const ENTITY_HEADER: [&str; 9] = [
    "document_id",
    "entity_id",
    "start",
    "end",
    "text",
    "type",
    "code",
    "annotator",
    "timestamp",
];

const RELATION_HEADER: [&str; 8] = [
    "document_id",
    "relation_id",
    "source_entity_id",
    "target_entity_id",
    "relation_type",
    "direction",
    "annotator",
    "timestamp",
];

pub fn entities_csv(docs: &[Document]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ENTITY_HEADER)?;

    for doc in docs {
        for e in &doc.entities {
            let start = e.start.to_string();
            let end = e.end.to_string();
            let timestamp = e.timestamp.to_rfc3339();
            writer.write_record([
                doc.id.as_str(),
                e.id.as_str(),
                start.as_str(),
                end.as_str(),
                e.text.as_str(),
                e.entity_type.as_str(),
                e.code.as_deref().unwrap_or(""),
                e.annotator.as_deref().unwrap_or(""),
                timestamp.as_str(),
            ])?;
        }
    }

    finish(writer)
}

pub fn relations_csv(docs: &[Document]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(RELATION_HEADER)?;

    for doc in docs {
        for r in &doc.relations {
            let timestamp = r.timestamp.to_rfc3339();
            writer.write_record([
                doc.id.as_str(),
                r.id.as_str(),
                r.source_entity_id.as_str(),
                r.target_entity_id.as_str(),
                r.relation_type.as_str(),
                r.direction.as_str(),
                r.annotator.as_deref().unwrap_or(""),
                timestamp.as_str(),
            ])?;
        }
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{Direction, Entity, Relation};

    fn sample() -> Document {
        let timestamp = "2026-01-02T03:04:05Z".parse().unwrap();
        let mut doc = Document::new("d1", "Hypertension, treated with amlodipine.");
        doc.entities.push(Entity {
            id: "e1".to_string(),
            start: 0,
            end: 12,
            text: "Hypertension".to_string(),
            entity_type: "Disease".to_string(),
            code: Some("I10".to_string()),
            annotator: Some("anon".to_string()),
            timestamp,
        });
        doc.entities.push(Entity {
            id: "e2".to_string(),
            start: 0,
            end: 13,
            text: "Hypertension,".to_string(),
            entity_type: "Disease".to_string(),
            code: None,
            annotator: None,
            timestamp,
        });
        doc.relations.push(Relation {
            id: "r1".to_string(),
            source_entity_id: "e2".to_string(),
            target_entity_id: "e1".to_string(),
            relation_type: "treats".to_string(),
            direction: Direction::Reverse,
            annotator: Some("anon".to_string()),
            timestamp,
        });
        doc
    }

    #[test]
    fn test_entities_csv() {
        let csv = entities_csv(&[sample()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "document_id,entity_id,start,end,text,type,code,annotator,timestamp");
        assert_eq!(lines[1], "d1,e1,0,12,Hypertension,Disease,I10,anon,2026-01-02T03:04:05+00:00");
        // Commas are quoted; missing optionals are empty.
        assert_eq!(lines[2], "d1,e2,0,13,\"Hypertension,\",Disease,,,2026-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_relations_csv() {
        let csv = relations_csv(&[sample()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "d1,r1,e2,e1,treats,reverse,anon,2026-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_empty_exports_have_headers_only() {
        assert_eq!(relations_csv(&[]).unwrap().lines().count(), 1);
        assert_eq!(entities_csv(&[]).unwrap().lines().count(), 1);
    }
}
