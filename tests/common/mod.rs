//! Builds study packages at test time: a real SQLite collection zipped
//! together with a media manifest and media members.

#![allow(dead_code)]

use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const CREATED: i64 = 1357304400;
pub const MODEL_ID: i64 = 1357356563296;
pub const DECK_ID: i64 = 1388721626870;
pub const DELETED_DECK_ID: i64 = 1388721700000;
pub const FILTERED_DECK_ID: i64 = 1388721710000;
pub const NOTE_ID: i64 = 1388721680877;
pub const DELETED_NOTE_ID: i64 = 1388721690000;
pub const CARD_ID: i64 = 1388721683902;
pub const DELETED_CARD_ID: i64 = 1388721693000;
pub const CHECKSUM: i64 = 1090091728;

const SCHEMA: &str = r#"
CREATE TABLE col (
    id integer primary key, crt integer not null, mod integer not null, scm integer not null,
    ver integer not null, dty integer not null, usn integer not null, ls integer not null,
    conf text not null, models text not null, decks text not null, dconf text not null, tags text not null
);
CREATE TABLE notes (
    id integer primary key, guid text not null, mid integer not null, mod integer not null,
    usn integer not null, tags text not null, flds text not null, sfld integer not null,
    csum integer not null, flags integer not null, data text not null
);
CREATE TABLE cards (
    id integer primary key, nid integer not null, did integer not null, ord integer not null,
    mod integer not null, usn integer not null, type integer not null, queue integer not null,
    due integer not null, ivl integer not null, factor integer not null, reps integer not null,
    lapses integer not null, left integer not null, odue integer not null, odid integer not null,
    flags integer not null, data text not null
);
CREATE TABLE revlog (
    id integer primary key, cid integer not null, usn integer not null, ease integer not null,
    ivl integer not null, lastIvl integer not null, factor integer not null, time integer not null,
    type integer not null
);
CREATE TABLE graves (usn integer not null, oid integer not null, type integer not null);
"#;

const CONF: &str = r#"{"nextPos": 2, "estTimes": true, "activeDecks": [1], "sortType": "noteFld", "timeLim": 600, "sortBackwards": false, "addToCur": true, "curDeck": 1, "newBury": true, "newSpread": 0, "dueCounts": true, "curModel": "1357356563296", "collapseTime": 1200}"#;

const MODELS: &str = r#"{"1357356563296": {"vers": [], "name": "Basic", "tags": [], "did": 1388721626870, "usn": -1, "req": [[0, "all", [0]]], "flds": [{"name": "Front", "media": [], "sticky": false, "rtl": false, "ord": 0, "font": "Arial", "size": 20}, {"name": "Back", "media": [], "sticky": false, "rtl": false, "ord": 1, "font": "Arial", "size": 20}], "sortf": 0, "latexPre": "", "tmpls": [{"name": "Card 1", "qfmt": "{{Front}}", "did": null, "bafmt": "", "afmt": "{{FrontSide}}<hr id=answer>{{Back}}", "ord": 0, "bqfmt": ""}], "latexPost": "", "type": 0, "id": 1357356563296, "css": ".card {}", "mod": 1388721663}}"#;

const DECKS: &str = r#"{"1": {"desc": "", "name": "Default", "extendedRev": 50, "usn": 0, "collapsed": false, "newToday": [0, 0], "timeToday": [0, 0], "dyn": 0, "extendedNew": 10, "conf": 1, "revToday": [0, 0], "lrnToday": [0, 0], "id": 1, "mod": 1388721663}, "1388721626870": {"desc": "", "name": "German", "extendedRev": 50, "usn": -1, "collapsed": false, "newToday": [366, 1], "timeToday": [366, 61200], "dyn": 0, "extendedNew": 10, "conf": 1, "revToday": [366, 0], "lrnToday": [366, 1], "id": 1388721626870, "mod": 1388721680}, "1388721700000": {"name": "Deleted", "dyn": 0, "conf": 1, "id": 1388721700000}, "1388721710000": {"name": "Cram", "dyn": 1, "id": 1388721710000}}"#;

const DCONF: &str = r#"{"1": {"name": "Default", "replayq": true, "lapse": {"leechFails": 8, "minInt": 1, "delays": [10], "leechAction": 0, "mult": 0}, "rev": {"perDay": 100, "fuzz": 0.05, "ivlFct": 1, "maxIvl": 36500, "ease4": 1.3, "bury": true, "minSpace": 1}, "timer": 0, "maxTaken": 60, "usn": 0, "new": {"perDay": 20, "delays": [1, 10], "separate": true, "ints": [1, 4, 7], "initialFactor": 2500, "bury": true, "order": 1}, "mod": 0, "id": 1, "autoplay": true}}"#;

const MEDIA_MANIFEST: &str = r#"{"0": "hund.jpg", "1": "hund.mp3", "9": "ghost.png"}"#;

/// A package under construction. Starts from a small German vocabulary
/// collection with one live card plus one deleted note, card and deck.
pub struct Package {
    statements: Vec<String>,
    database_member: &'static str,
    manifest: Option<String>,
    media: Vec<(String, Vec<u8>)>,
    include_database: bool,
}

impl Package {
    pub fn sample() -> Self {
        let statements = vec![
            format!(
                "INSERT INTO col VALUES (1, {CREATED}, 1388721770156, 1388721663279, 11, 0, 0, 0, '{CONF}', '{MODELS}', '{DECKS}', '{DCONF}', '{{}}')"
            ),
            format!(
                "INSERT INTO notes VALUES ({NOTE_ID}, 'O@?x>j|.yO', {MODEL_ID}, 1388721680, -1, ' vocab german ', 'Hund' || char(31) || 'dog', 'Hund', {CHECKSUM}, 0, '')"
            ),
            format!(
                "INSERT INTO notes VALUES ({DELETED_NOTE_ID}, 'deleted', {MODEL_ID}, 1388721690, -1, '', 'Katze' || char(31) || 'cat', 'Katze', 12345, 0, '')"
            ),
            format!(
                "INSERT INTO cards VALUES ({CARD_ID}, {NOTE_ID}, {DECK_ID}, 0, 1388721683, -1, 2, 2, 366, 21, 2500, 3, 0, 0, 0, 0, 0, '')"
            ),
            format!(
                "INSERT INTO cards VALUES ({DELETED_CARD_ID}, {DELETED_NOTE_ID}, {DECK_ID}, 0, 1388721693, -1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, '')"
            ),
            format!("INSERT INTO revlog VALUES (1388721765102, {CARD_ID}, -1, 3, -600, 0, 2500, 6120, 0)"),
            format!("INSERT INTO revlog VALUES (1388722000000, {CARD_ID}, -1, 3, 21, -600, 2500, 4000, 1)"),
            format!("INSERT INTO revlog VALUES (1388721766000, {DELETED_CARD_ID}, -1, 1, -60, 0, 0, 3000, 0)"),
            format!("INSERT INTO graves VALUES (-1, {DELETED_CARD_ID}, 0)"),
            format!("INSERT INTO graves VALUES (-1, {DELETED_NOTE_ID}, 1)"),
            format!("INSERT INTO graves VALUES (-1, {DELETED_DECK_ID}, 2)"),
        ];
        Self {
            statements,
            database_member: "collection.anki2",
            manifest: Some(MEDIA_MANIFEST.to_string()),
            media: vec![("0".to_string(), b"jpeg bytes".to_vec()), ("1".to_string(), b"mp3 bytes".to_vec())],
            include_database: true,
        }
    }

    /// Run an extra statement after the sample data is in place.
    pub fn sql(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    pub fn database_member(mut self, member: &'static str) -> Self {
        self.database_member = member;
        self
    }

    pub fn without_database(mut self) -> Self {
        self.include_database = false;
        self
    }

    pub fn manifest(mut self, manifest: Option<&str>) -> Self {
        self.manifest = manifest.map(str::to_string);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        if self.include_database {
            writer.start_file(self.database_member, SimpleFileOptions::default()).unwrap();
            writer.write_all(&database(&self.statements)).unwrap();
        }
        if let Some(manifest) = &self.manifest {
            writer.start_file("media", SimpleFileOptions::default()).unwrap();
            writer.write_all(manifest.as_bytes()).unwrap();
        }
        for (member, data) in &self.media {
            writer.start_file(member.as_str(), SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub fn write(self, dir: &Path) -> PathBuf {
        let path = dir.join("sample.apkg");
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

fn database(statements: &[String]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.anki2");
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    runtime.block_on(async {
        let options = SqliteConnectOptions::new().filename(&path).create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
        sqlx::raw_sql(SCHEMA).execute(&mut conn).await.unwrap();
        for statement in statements {
            sqlx::raw_sql(statement).execute(&mut conn).await.unwrap();
        }
        conn.close().await.unwrap();
    });
    std::fs::read(&path).unwrap()
}
