use rusqlite::Connection;

use crate::Result;

/// Collection schema version written into `col.ver`.
pub const COLLECTION_VERSION: i64 = 11;

/// Create the tables of a legacy (`collection.anki2`) collection.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS col (
            id integer primary key,
            crt integer not null,
            mod integer not null,
            scm integer not null,
            ver integer not null,
            dty integer not null,
            usn integer not null,
            ls integer not null,
            conf text not null,
            models text not null,
            decks text not null,
            dconf text not null,
            tags text not null
        );

        CREATE TABLE IF NOT EXISTS notes (
            id integer primary key,
            guid text not null,
            mid integer not null,
            mod integer not null,
            usn integer not null,
            tags text not null,
            flds text not null,
            sfld integer not null,
            csum integer not null,
            flags integer not null,
            data text not null
        );

        CREATE TABLE IF NOT EXISTS cards (
            id integer primary key,
            nid integer not null,
            did integer not null,
            ord integer not null,
            mod integer not null,
            usn integer not null,
            type integer not null,
            queue integer not null,
            due integer not null,
            ivl integer not null,
            factor integer not null,
            reps integer not null,
            lapses integer not null,
            left integer not null,
            odue integer not null,
            odid integer not null,
            flags integer not null,
            data text not null
        );

        CREATE TABLE IF NOT EXISTS revlog (
            id integer primary key,
            cid integer not null,
            usn integer not null,
            ease integer not null,
            ivl integer not null,
            lastIvl integer not null,
            factor integer not null,
            time integer not null,
            type integer not null
        );

        CREATE TABLE IF NOT EXISTS graves (
            usn integer not null,
            oid integer not null,
            type integer not null
        );

        CREATE INDEX IF NOT EXISTS ix_notes_usn on notes (usn);
        CREATE INDEX IF NOT EXISTS ix_cards_usn on cards (usn);
        CREATE INDEX IF NOT EXISTS ix_revlog_usn on revlog (usn);
        CREATE INDEX IF NOT EXISTS ix_cards_nid on cards (nid);
        CREATE INDEX IF NOT EXISTS ix_cards_sched on cards (did, queue, due);
        CREATE INDEX IF NOT EXISTS ix_revlog_cid on revlog (cid);
        CREATE INDEX IF NOT EXISTS ix_notes_csum on notes (csum);
        "#,
    )?;

    Ok(())
}
