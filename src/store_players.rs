use std::collections::HashMap;

use chrono::Utc;
use log::info;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{NewPlayer, Player, PlayerUpdate, new_unique_id};
use crate::store::{PLAYER_COLUMNS, PLAYER_REFERENCING_TABLES, Store, delete_where, player_from_row};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDeletion {
    pub id: Uuid,
    pub roster_entries: usize,
    pub participants: usize,
    pub evaluations: usize,
    pub action_stats: usize,
    pub lineups: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupeSummary {
    pub removed: usize,
    pub kept: usize,
}

impl Store {
    pub fn create_player(&mut self, input: NewPlayer) -> StoreResult<Player> {
        let player = Player {
            id: Uuid::new_v4(),
            unique_id: new_unique_id(),
            first_name: input.first_name,
            last_name: input.last_name,
            birthdate: input.birthdate,
            nation: input.nation,
            plays_in: input.plays_in,
            position: input.position,
            club: input.club,
            level: input.level,
            height: input.height,
            foot: input.foot,
            note: input.note,
            photo_data: input.photo_data,
            shortlisted: input.shortlisted.unwrap_or(false),
            created_at: Utc::now(),
        };
        insert_player(self.connection(), &player)?;
        info!(
            "created player {} ({} {})",
            player.id, player.first_name, player.last_name
        );
        Ok(player)
    }

    pub fn find_player(&self, player_id: Uuid) -> StoreResult<Option<Player>> {
        find_player(self.connection(), player_id)
    }

    pub fn get_player(&self, player_id: Uuid) -> StoreResult<Player> {
        self.find_player(player_id)?
            .ok_or(StoreError::not_found("Player", player_id))
    }

    pub fn list_players(&self) -> StoreResult<Vec<Player>> {
        let sql =
            format!("SELECT {PLAYER_COLUMNS} FROM player ORDER BY created_at DESC, rowid DESC");
        let mut stmt = self.connection().prepare(&sql)?;
        let rows = stmt.query_map([], player_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn update_player(&mut self, player_id: Uuid, update: PlayerUpdate) -> StoreResult<Player> {
        let mut player = self.get_player(player_id)?;
        if let Some(v) = update.first_name {
            player.first_name = v;
        }
        if let Some(v) = update.last_name {
            player.last_name = v;
        }
        if let Some(v) = update.birthdate {
            player.birthdate = v;
        }
        if let Some(v) = update.nation {
            player.nation = v;
        }
        if update.plays_in.is_some() {
            player.plays_in = update.plays_in;
        }
        if update.position.is_some() {
            player.position = update.position;
        }
        if update.club.is_some() {
            player.club = update.club;
        }
        if update.level.is_some() {
            player.level = update.level;
        }
        if update.height.is_some() {
            player.height = update.height;
        }
        if update.foot.is_some() {
            player.foot = update.foot;
        }
        if update.note.is_some() {
            player.note = update.note;
        }
        if update.photo_data.is_some() {
            player.photo_data = update.photo_data;
        }
        if let Some(v) = update.shortlisted {
            player.shortlisted = v;
        }
        self.connection().execute(
            "UPDATE player SET
                first_name = ?2, last_name = ?3, birthdate = ?4, nation = ?5, plays_in = ?6,
                position = ?7, club = ?8, level = ?9, height = ?10, foot = ?11, note = ?12,
                photo_data = ?13, shortlisted = ?14
             WHERE id = ?1",
            params![
                player.id,
                player.first_name,
                player.last_name,
                player.birthdate,
                player.nation,
                player.plays_in,
                player.position,
                player.club,
                player.level,
                player.height,
                player.foot,
                player.note,
                player.photo_data,
                player.shortlisted,
            ],
        )?;
        info!("updated player {player_id}");
        Ok(player)
    }

    pub fn set_shortlisted(&mut self, player_id: Uuid, shortlisted: bool) -> StoreResult<Player> {
        self.update_player(
            player_id,
            PlayerUpdate {
                shortlisted: Some(shortlisted),
                ..Default::default()
            },
        )
    }

    /// Deletes a player together with every roster entry, tournament
    /// participation, evaluation, action stat and lineup row referencing it.
    pub fn delete_player(&mut self, player_id: Uuid) -> StoreResult<PlayerDeletion> {
        let tx = self.connection_mut().transaction()?;
        if find_player(&tx, player_id)?.is_none() {
            return Err(StoreError::not_found("Player", player_id));
        }
        let summary = cascade_delete_player(&tx, player_id)?;
        tx.commit()?;
        info!(
            "deleted player {player_id}: roster={} participants={} evaluations={} stats={} lineups={}",
            summary.roster_entries,
            summary.participants,
            summary.evaluations,
            summary.action_stats,
            summary.lineups
        );
        Ok(summary)
    }

    /// Removes players sharing a first+last name (case-insensitive, trimmed),
    /// keeping the earliest registration of each name.
    pub fn dedupe_players(&mut self) -> StoreResult<DedupeSummary> {
        let tx = self.connection_mut().transaction()?;
        let players = {
            let sql =
                format!("SELECT {PLAYER_COLUMNS} FROM player ORDER BY created_at ASC, rowid ASC");
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt.query_map([], player_from_row)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            out
        };

        let mut seen: HashMap<String, Uuid> = HashMap::new();
        let mut duplicates = Vec::new();
        for player in &players {
            let key = player.name_key();
            if seen.contains_key(&key) {
                duplicates.push(player.id);
            } else {
                seen.insert(key, player.id);
            }
        }

        for player_id in &duplicates {
            cascade_delete_player(&tx, *player_id)?;
        }
        tx.commit()?;

        let summary = DedupeSummary {
            removed: duplicates.len(),
            kept: seen.len(),
        };
        info!(
            "dedupe players: removed={} kept={}",
            summary.removed, summary.kept
        );
        Ok(summary)
    }
}

pub(crate) fn find_player(conn: &Connection, player_id: Uuid) -> StoreResult<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM player WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![player_id], player_from_row)
        .optional()?)
}

fn insert_player(conn: &Connection, p: &Player) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO player (
            id, unique_id, first_name, last_name, birthdate, nation, plays_in, position,
            club, level, height, foot, note, photo_data, shortlisted, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            p.id,
            p.unique_id,
            p.first_name,
            p.last_name,
            p.birthdate,
            p.nation,
            p.plays_in,
            p.position,
            p.club,
            p.level,
            p.height,
            p.foot,
            p.note,
            p.photo_data,
            p.shortlisted,
            p.created_at,
        ],
    )?;
    Ok(())
}

fn cascade_delete_player(conn: &Connection, player_id: Uuid) -> StoreResult<PlayerDeletion> {
    let mut counts = [0usize; PLAYER_REFERENCING_TABLES.len()];
    for (slot, table) in counts.iter_mut().zip(PLAYER_REFERENCING_TABLES) {
        *slot = delete_where(conn, table, "player_id", player_id)?;
    }
    delete_where(conn, "player", "id", player_id)?;
    let [roster_entries, participants, evaluations, action_stats, lineups] = counts;
    Ok(PlayerDeletion {
        id: player_id,
        roster_entries,
        participants,
        evaluations,
        action_stats,
        lineups,
    })
}
