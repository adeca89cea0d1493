use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::record::MapRecord;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS extractions (
            id            INTEGER PRIMARY KEY,
            map_id        TEXT NOT NULL,
            province      TEXT,
            regency       TEXT,
            district      TEXT,
            village       TEXT,
            scale         TEXT,
            valid         BOOLEAN NOT NULL,
            business_count INTEGER NOT NULL DEFAULT 0,
            households    INTEGER NOT NULL DEFAULT 0,
            total_load    INTEGER NOT NULL DEFAULT 0,
            record        TEXT NOT NULL,
            processed_at  TEXT NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_extractions_map ON extractions(map_id);
        CREATE INDEX IF NOT EXISTS idx_extractions_valid ON extractions(valid);

        CREATE TABLE IF NOT EXISTS segments (
            id              INTEGER PRIMARY KEY,
            extraction_id   INTEGER NOT NULL REFERENCES extractions(id),
            number          INTEGER NOT NULL,
            sub_sls_code    TEXT NOT NULL,
            name            TEXT NOT NULL,
            unit            TEXT NOT NULL CHECK(unit IN ('environment','street','village')),
            area_type       TEXT NOT NULL,
            load_code       INTEGER NOT NULL,
            classifiers_agree BOOLEAN NOT NULL,
            households      INTEGER NOT NULL,
            residential     INTEGER NOT NULL,
            vacant          INTEGER NOT NULL,
            business_bldg   INTEGER NOT NULL,
            non_business    INTEGER NOT NULL,
            business_count  INTEGER NOT NULL,
            total_load      INTEGER NOT NULL,
            UNIQUE(extraction_id, number)
        );
        CREATE INDEX IF NOT EXISTS idx_segments_extraction ON segments(extraction_id);

        CREATE TABLE IF NOT EXISTS businesses (
            id            INTEGER PRIMARY KEY,
            extraction_id INTEGER NOT NULL REFERENCES extractions(id),
            name          TEXT NOT NULL,
            category      TEXT NOT NULL,
            environment   TEXT,
            line          INTEGER NOT NULL,
            address       TEXT,
            latitude      REAL,
            longitude     REAL,
            accuracy      TEXT,
            UNIQUE(extraction_id, name)
        );
        CREATE INDEX IF NOT EXISTS idx_businesses_extraction ON businesses(extraction_id);
        ",
    )?;
    Ok(())
}

/// Store a record with its segments and businesses. Returns the extraction id.
pub fn save_record(conn: &Connection, record: &MapRecord, valid: bool) -> Result<i64> {
    let totals = record.totals();
    let json = serde_json::to_string(record)?;
    let tx = conn.unchecked_transaction()?;
    let id;
    {
        tx.execute(
            "INSERT INTO extractions
             (map_id, province, regency, district, village, scale, valid,
              business_count, households, total_load, record, processed_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            rusqlite::params![
                record.admin.map_id,
                record.admin.province,
                record.admin.regency,
                record.admin.district,
                record.admin.village,
                record.admin.scale,
                valid,
                totals.business_count,
                totals.households,
                totals.total_load,
                json,
                record.processed_at.to_rfc3339(),
            ],
        )?;
        id = tx.last_insert_rowid();

        let mut s_stmt = tx.prepare(
            "INSERT INTO segments
             (extraction_id, number, sub_sls_code, name, unit, area_type, load_code,
              classifiers_agree, households, residential, vacant, business_bldg,
              non_business, business_count, total_load)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)",
        )?;
        for s in &record.segments {
            s_stmt.execute(rusqlite::params![
                id,
                s.number,
                s.sub_sls_code,
                s.name,
                s.unit.as_str(),
                s.area_type.as_str(),
                s.load_code,
                s.classifiers_agree,
                s.households,
                s.residential_buildings,
                s.vacant_residential,
                s.business_buildings,
                s.non_business_buildings,
                s.business_count,
                s.total_load,
            ])?;
        }

        let mut b_stmt = tx.prepare(
            "INSERT OR IGNORE INTO businesses
             (extraction_id, name, category, environment, line, address, latitude, longitude, accuracy)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        )?;
        for b in &record.businesses {
            let e = b.enrichment.as_ref();
            let coords = e.and_then(|e| e.coordinates);
            b_stmt.execute(rusqlite::params![
                id,
                b.name,
                b.category.as_str(),
                b.environment,
                b.line,
                e.map(|e| e.address.clone()),
                coords.map(|c| c.latitude),
                coords.map(|c| c.longitude),
                e.map(|e| e.accuracy.as_str()),
            ])?;
        }
    }
    tx.commit()?;
    Ok(id)
}

/// Load a stored record back for re-segmentation.
pub fn fetch_record(conn: &Connection, id: i64) -> Result<Option<MapRecord>> {
    let mut stmt = conn.prepare("SELECT record FROM extractions WHERE id = ?1")?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => {
            let json: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&json)?))
        }
        None => Ok(None),
    }
}

// ── Overview ──

pub struct OverviewRow {
    pub id: i64,
    pub map_id: String,
    pub village: String,
    pub regency: String,
    pub valid: bool,
    pub segments: usize,
    pub business_count: u32,
    pub households: u32,
    pub total_load: u32,
}

pub fn fetch_overview(conn: &Connection, valid_only: bool, limit: usize) -> Result<Vec<OverviewRow>> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if valid_only {
        conditions.push(format!("e.valid = ?{}", params.len() + 1));
        params.push(Box::new(true));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT e.id, e.map_id, COALESCE(e.village,''), COALESCE(e.regency,''), e.valid,
                (SELECT COUNT(*) FROM segments s WHERE s.extraction_id = e.id),
                e.business_count, e.households, e.total_load
         FROM extractions e{}
         ORDER BY e.id DESC
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(OverviewRow {
                id: row.get(0)?,
                map_id: row.get(1)?,
                village: row.get(2)?,
                regency: row.get(3)?,
                valid: row.get(4)?,
                segments: row.get(5)?,
                business_count: row.get(6)?,
                households: row.get(7)?,
                total_load: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub extractions: usize,
    pub valid: usize,
    pub invalid: usize,
    pub segments: usize,
    pub businesses: usize,
    pub enriched: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let extractions: usize =
        conn.query_row("SELECT COUNT(*) FROM extractions", [], |r| r.get(0))?;
    let valid: usize =
        conn.query_row("SELECT COUNT(*) FROM extractions WHERE valid = 1", [], |r| r.get(0))?;
    let segments: usize = conn.query_row("SELECT COUNT(*) FROM segments", [], |r| r.get(0))?;
    let businesses: usize =
        conn.query_row("SELECT COUNT(*) FROM businesses", [], |r| r.get(0))?;
    let enriched: usize = conn.query_row(
        "SELECT COUNT(*) FROM businesses WHERE address IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        extractions,
        valid,
        invalid: extractions - valid,
        segments,
        businesses,
        enriched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::resynthesize;
    use crate::record::{
        AdministrativeRecord, BusinessCategory, BusinessEntity, Environment, MapRecord,
    };

    fn record(map_id: &str) -> MapRecord {
        let r = MapRecord {
            admin: AdministrativeRecord {
                map_id: map_id.to_string(),
                province: "BALI".into(),
                regency: "DENPASAR".into(),
                district: "DENPASAR BARAT".into(),
                village: "DAUH PURI".into(),
                scale: "1:1500".into(),
            },
            businesses: vec![BusinessEntity {
                name: "Toko Sederhana".into(),
                category: BusinessCategory::Store,
                environment: Some("KAMPUNG BARU".into()),
                environment_code: Some("03".into()),
                line: 12,
                enrichment: None,
            }],
            environments: vec![Environment {
                name: "KAMPUNG BARU".into(),
                code: "03".into(),
                synthesized: false,
            }],
            ..MapRecord::default()
        };
        resynthesize(r).unwrap().record
    }

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn save_and_overview() {
        let conn = memory();
        save_record(&conn, &record("5171030005000300"), true).unwrap();
        save_record(&conn, &record("123"), false).unwrap();

        let all = fetch_overview(&conn, false, 10).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].map_id, "123");

        let valid = fetch_overview(&conn, true, 10).unwrap();
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].segments, 1);
        assert_eq!(valid[0].business_count, 1);

        let s = get_stats(&conn).unwrap();
        assert_eq!((s.extractions, s.valid, s.invalid), (2, 1, 1));
        assert_eq!(s.segments, 2);
        assert_eq!(s.businesses, 2);
        assert_eq!(s.enriched, 0);
    }

    #[test]
    fn stored_record_reloads() {
        let conn = memory();
        let r = record("5171030005000300");
        let id = save_record(&conn, &r, true).unwrap();
        assert_eq!(fetch_record(&conn, id).unwrap(), Some(r));
        assert_eq!(fetch_record(&conn, id + 1).unwrap(), None);
    }
}
