use chrono::Utc;
use log::{debug, info};
use rusqlite::params;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{ActionStat, Evaluation, NewActionStat, NewEvaluation};
use crate::scoring::{self, ScoreReport};
use crate::store::{
    ACTION_STAT_COLUMNS, EVALUATION_COLUMNS, Store, action_stat_from_row, ensure_ref,
    evaluation_from_row,
};

impl Store {
    pub fn create_evaluation(&mut self, input: NewEvaluation) -> StoreResult<Evaluation> {
        let conn = self.connection();
        ensure_ref(conn, "player", "player", input.player_id)?;
        ensure_ref(conn, "tournament", "event", input.event_id)?;
        let evaluation = Evaluation {
            id: Uuid::new_v4(),
            event_id: input.event_id,
            player_id: input.player_id,
            scout_name: input.scout_name,
            rating_technique: input.rating_technique,
            rating_physical: input.rating_physical,
            rating_intelligence: input.rating_intelligence,
            rating_mentality: input.rating_mentality,
            rating_impact: input.rating_impact,
            strengths: input.strengths,
            weaknesses: input.weaknesses,
            remarks: input.remarks,
            created_at: Utc::now(),
        };
        conn.execute(
            "INSERT INTO evaluation (
                id, event_id, player_id, scout_name,
                rating_technique, rating_physical, rating_intelligence, rating_mentality, rating_impact,
                strengths, weaknesses, remarks, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                evaluation.id,
                evaluation.event_id,
                evaluation.player_id,
                evaluation.scout_name,
                evaluation.rating_technique,
                evaluation.rating_physical,
                evaluation.rating_intelligence,
                evaluation.rating_mentality,
                evaluation.rating_impact,
                evaluation.strengths,
                evaluation.weaknesses,
                evaluation.remarks,
                evaluation.created_at,
            ],
        )?;
        info!(
            "evaluation {} by {} for player {} at event {}",
            evaluation.id, evaluation.scout_name, evaluation.player_id, evaluation.event_id
        );
        Ok(evaluation)
    }

    pub fn list_evaluations(
        &self,
        player_id: Uuid,
        event_id: Option<Uuid>,
    ) -> StoreResult<Vec<Evaluation>> {
        let sql = format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluation
             WHERE player_id = ?1 AND (?2 IS NULL OR event_id = ?2)
             ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = self.connection().prepare(&sql)?;
        let rows = stmt.query_map(params![player_id, event_id], evaluation_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn create_action_stat(&mut self, input: NewActionStat) -> StoreResult<ActionStat> {
        let conn = self.connection();
        ensure_ref(conn, "player", "player", input.player_id)?;
        ensure_ref(conn, "tournament", "event", input.event_id)?;
        let stat = ActionStat {
            id: Uuid::new_v4(),
            event_id: input.event_id,
            player_id: input.player_id,
            minutes: input.minutes,
            shots: input.shots,
            passes: input.passes,
            duels: input.duels,
            goals: input.goals,
            assists: input.assists,
        };
        conn.execute(
            "INSERT INTO action_stat (
                id, event_id, player_id, minutes, shots, passes, duels, goals, assists
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                stat.id,
                stat.event_id,
                stat.player_id,
                stat.minutes,
                stat.shots,
                stat.passes,
                stat.duels,
                stat.goals,
                stat.assists,
            ],
        )?;
        info!(
            "action stat {} for player {} at event {}: {} min",
            stat.id, stat.player_id, stat.event_id, stat.minutes
        );
        Ok(stat)
    }

    pub fn list_action_stats(
        &self,
        player_id: Uuid,
        event_id: Option<Uuid>,
    ) -> StoreResult<Vec<ActionStat>> {
        let sql = format!(
            "SELECT {ACTION_STAT_COLUMNS} FROM action_stat
             WHERE player_id = ?1 AND (?2 IS NULL OR event_id = ?2)
             ORDER BY rowid"
        );
        let mut stmt = self.connection().prepare(&sql)?;
        let rows = stmt.query_map(params![player_id, event_id], action_stat_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn player_score(&self, player_id: Uuid, event_id: Option<Uuid>) -> StoreResult<ScoreReport> {
        if self.find_player(player_id)?.is_none() {
            return Err(StoreError::not_found("Player", player_id));
        }
        let evaluations = self.list_evaluations(player_id, event_id)?;
        let stats = self.list_action_stats(player_id, event_id)?;
        let report = scoring::compute_score(&evaluations, &stats);
        debug!(
            "score for player {player_id} (event {:?}): {} from {} evaluations, {} stats",
            event_id,
            report.score,
            evaluations.len(),
            stats.len()
        );
        Ok(report)
    }
}
