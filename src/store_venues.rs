use log::info;
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{NewVenue, PitchInput, Venue, VenueUpdate};
use crate::read_model::{self, VenueView};
use crate::store::{Store, VENUE_COLUMNS, delete_where, venue_from_row};

impl Store {
    pub fn create_venue(&mut self, input: NewVenue) -> StoreResult<VenueView> {
        let tx = self.connection_mut().transaction()?;
        let venue = Venue {
            id: Uuid::new_v4(),
            name: input.name,
            address: input.address,
            home_club: input.home_club,
            contact: input.contact,
            price: input.price,
            note: input.note,
            photo_data: input.photo_data,
        };
        tx.execute(
            "INSERT INTO venue (id, name, address, home_club, contact, price, note, photo_data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                venue.id,
                venue.name,
                venue.address,
                venue.home_club,
                venue.contact,
                venue.price,
                venue.note,
                venue.photo_data,
            ],
        )?;
        insert_pitches(&tx, venue.id, &input.pitches)?;
        let view = read_model::venue_view(&tx, venue)?;
        tx.commit()?;
        info!(
            "created venue {} ({}) with {} pitches",
            view.venue.id,
            view.venue.name,
            view.pitches.len()
        );
        Ok(view)
    }

    pub fn get_venue(&self, venue_id: Uuid) -> StoreResult<VenueView> {
        let venue = read_model::find_venue(self.connection(), venue_id)?
            .ok_or(StoreError::not_found("Venue", venue_id))?;
        read_model::venue_view(self.connection(), venue)
    }

    pub fn list_venues(&self) -> StoreResult<Vec<VenueView>> {
        let conn = self.connection();
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venue ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], venue_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(read_model::venue_view(conn, row?)?);
        }
        Ok(out)
    }

    pub fn update_venue(&mut self, venue_id: Uuid, update: VenueUpdate) -> StoreResult<VenueView> {
        let tx = self.connection_mut().transaction()?;
        let mut venue = read_model::find_venue(&tx, venue_id)?
            .ok_or(StoreError::not_found("Venue", venue_id))?;
        if let Some(v) = update.name {
            venue.name = v;
        }
        if update.address.is_some() {
            venue.address = update.address;
        }
        if update.home_club.is_some() {
            venue.home_club = update.home_club;
        }
        if update.contact.is_some() {
            venue.contact = update.contact;
        }
        if update.price.is_some() {
            venue.price = update.price;
        }
        if update.note.is_some() {
            venue.note = update.note;
        }
        if update.photo_data.is_some() {
            venue.photo_data = update.photo_data;
        }
        tx.execute(
            "UPDATE venue SET
                name = ?2, address = ?3, home_club = ?4, contact = ?5, price = ?6, note = ?7,
                photo_data = ?8
             WHERE id = ?1",
            params![
                venue.id,
                venue.name,
                venue.address,
                venue.home_club,
                venue.contact,
                venue.price,
                venue.note,
                venue.photo_data,
            ],
        )?;
        if let Some(pitches) = update.pitches {
            unlink_game_pitches(&tx, venue_id)?;
            delete_where(&tx, "venue_pitch", "venue_id", venue_id)?;
            insert_pitches(&tx, venue_id, &pitches)?;
        }
        let view = read_model::venue_view(&tx, venue)?;
        tx.commit()?;
        info!("updated venue {venue_id}");
        Ok(view)
    }

    /// Deletes a venue and its pitches. Tournaments hosted there and games
    /// played on its pitches lose the link but are otherwise untouched.
    pub fn delete_venue(&mut self, venue_id: Uuid) -> StoreResult<()> {
        let tx = self.connection_mut().transaction()?;
        if read_model::find_venue(&tx, venue_id)?.is_none() {
            return Err(StoreError::not_found("Venue", venue_id));
        }
        let games = unlink_game_pitches(&tx, venue_id)?;
        let pitches = delete_where(&tx, "venue_pitch", "venue_id", venue_id)?;
        let unlinked = tx.execute(
            "UPDATE tournament SET venue_id = NULL WHERE venue_id = ?1",
            params![venue_id],
        )?;
        delete_where(&tx, "venue", "id", venue_id)?;
        tx.commit()?;
        info!(
            "deleted venue {venue_id}: pitches={pitches} tournaments unlinked={unlinked} games unlinked={games}"
        );
        Ok(())
    }
}

fn unlink_game_pitches(conn: &Connection, venue_id: Uuid) -> StoreResult<usize> {
    Ok(conn.execute(
        "UPDATE game SET pitch_id = NULL
         WHERE pitch_id IN (SELECT id FROM venue_pitch WHERE venue_id = ?1)",
        params![venue_id],
    )?)
}

fn insert_pitches(conn: &Connection, venue_id: Uuid, pitches: &[PitchInput]) -> StoreResult<()> {
    for pitch in pitches {
        conn.execute(
            "INSERT INTO venue_pitch (id, venue_id, label, surface, lights) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![Uuid::new_v4(), venue_id, pitch.label, pitch.surface, pitch.lights],
        )?;
    }
    Ok(())
}
