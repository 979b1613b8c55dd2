// src/repositories/sqlite/sqlite_trainer_repository.rs
//
// Trainer persistence on SQLite (`entrenador` + `entrenador_pokemon`)

use std::collections::BTreeMap;
use std::sync::Arc;

use rusqlite::{params, Connection, Params, Row, TransactionBehavior};

use crate::db::ConnectionPool;
use crate::domain::{Entity, PokedexNumber, Region, Trainer, TrainerId};
use crate::error::{AppError, AppResult};
use crate::repositories::sqlite::{conversion_failure, next_orden_sql};
use crate::repositories::traits::{Repository, TrainerRepository};

pub struct SqliteTrainerRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteTrainerRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_parts(row: &Row) -> rusqlite::Result<(TrainerId, String, Region)> {
        let id: String = row.get(0)?;
        let id = TrainerId::parse(id).map_err(|e| conversion_failure(0, e))?;

        let nombre: String = row.get(1)?;

        let region: String = row.get(2)?;
        let region = region
            .parse::<Region>()
            .map_err(|e| conversion_failure(2, e))?;

        Ok((id, nombre, region))
    }

    fn owned_numbers(conn: &Connection, id: &TrainerId) -> AppResult<Vec<PokedexNumber>> {
        let mut stmt = conn.prepare(
            "SELECT pokedex_number FROM entrenador_pokemon
             WHERE entrenador_id = ?1
             ORDER BY posicion",
        )?;

        let numbers = stmt
            .query_map(params![id.as_str()], |row| {
                let number: String = row.get(0)?;
                PokedexNumber::parse(number).map_err(|e| conversion_failure(0, e))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(numbers)
    }

    fn select<P: Params>(conn: &Connection, filter: &str, params: P) -> AppResult<Vec<Trainer>> {
        let sql = format!(
            "SELECT id, nombre, region FROM entrenador {} ORDER BY orden",
            filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_parts)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut trainers = Vec::with_capacity(rows.len());
        for (id, nombre, region) in rows {
            let owned = Self::owned_numbers(conn, &id)?;
            trainers.push(Trainer::with_creatures(id, nombre, region, owned)?);
        }
        Ok(trainers)
    }

    fn query<P: Params>(&self, filter: &str, params: P) -> AppResult<Vec<Trainer>> {
        let conn = self.pool.get()?;
        Self::select(&conn, filter, params)
    }

    fn write(conn: &Connection, trainer: &Trainer) -> AppResult<()> {
        trainer.validate()?;
        let id = trainer.id().as_str();

        conn.execute(
            &format!(
                "INSERT INTO entrenador (id, nombre, region, orden)
                 VALUES (?1, ?2, ?3, {})
                 ON CONFLICT(id) DO UPDATE SET
                    nombre = excluded.nombre,
                    region = excluded.region",
                next_orden_sql("entrenador")
            ),
            params![id, trainer.nombre(), trainer.region().as_str()],
        )?;

        conn.execute(
            "DELETE FROM entrenador_pokemon WHERE entrenador_id = ?1",
            params![id],
        )?;
        let mut stmt = conn.prepare(
            "INSERT INTO entrenador_pokemon (entrenador_id, pokedex_number, posicion)
             VALUES (?1, ?2, ?3)",
        )?;
        for (posicion, number) in trainer.pokedex_numbers().iter().enumerate() {
            stmt.execute(params![id, number.as_str(), posicion as i64])?;
        }
        Ok(())
    }
}

impl Repository<Trainer> for SqliteTrainerRepository {
    fn find_by_id(&self, id: &TrainerId) -> AppResult<Option<Trainer>> {
        Ok(self
            .query("WHERE id = ?1", params![id.as_str()])?
            .into_iter()
            .next())
    }

    fn find_all(&self) -> AppResult<Vec<Trainer>> {
        self.query("", [])
    }

    fn save(&self, trainer: &Trainer) -> AppResult<Trainer> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        Self::write(&tx, trainer)?;
        tx.commit()?;
        Ok(trainer.clone())
    }

    fn update(
        &self,
        id: &TrainerId,
        apply: &mut dyn FnMut(&mut Trainer) -> AppResult<bool>,
    ) -> AppResult<bool> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut trainer = Self::select(&tx, "WHERE id = ?1", params![id.as_str()])?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(Trainer::KIND, id))?;

        if !apply(&mut trainer)? {
            return Ok(false);
        }

        Self::write(&tx, &trainer)?;
        tx.commit()?;
        Ok(true)
    }

    fn delete_by_id(&self, id: &TrainerId) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM entrenador WHERE id = ?1", params![id.as_str()])?;

        if deleted > 0 {
            log::debug!("Deleted Entrenador {}", id);
        }
        Ok(deleted > 0)
    }

    fn delete_all(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM entrenador", [])?;
        Ok(())
    }

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM entrenador", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn exists_by_id(&self, id: &TrainerId) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM entrenador WHERE id = ?1)",
            params![id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl TrainerRepository for SqliteTrainerRepository {
    fn find_by_region(&self, region: Region) -> AppResult<Vec<Trainer>> {
        self.query("WHERE region = ?1", params![region.as_str()])
    }

    fn find_by_creature(&self, number: &PokedexNumber) -> AppResult<Vec<Trainer>> {
        self.query(
            "WHERE id IN (
                SELECT entrenador_id FROM entrenador_pokemon WHERE pokedex_number = ?1
             )",
            params![number.as_str()],
        )
    }

    fn count_by_region(&self) -> AppResult<BTreeMap<Region, usize>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT region, COUNT(*) FROM entrenador GROUP BY region")?;

        let counts = stmt
            .query_map([], |row| {
                let region: String = row.get(0)?;
                let region = region
                    .parse::<Region>()
                    .map_err(|e| conversion_failure(0, e))?;
                let count: i64 = row.get(1)?;
                Ok((region, count as usize))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(counts)
    }
}
