// src/repositories/sqlite/sqlite_move_repository.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use rusqlite::{params, Connection, Params, Row, TransactionBehavior};

use crate::db::ConnectionPool;
use crate::domain::{Category, Entity, Move, MoveId};
use crate::error::{AppError, AppResult};
use crate::repositories::sqlite::{conversion_failure, next_orden_sql};
use crate::repositories::traits::{MoveRepository, Repository};

pub struct SqliteMoveRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMoveRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_move(row: &Row) -> rusqlite::Result<Move> {
        let id: String = row.get("id")?;
        let id = MoveId::parse(id).map_err(|e| conversion_failure(0, e))?;

        let nombre: String = row.get("nombre")?;

        let tipo: String = row.get("tipo")?;
        let tipo = tipo
            .parse::<Category>()
            .map_err(|e| conversion_failure(2, e))?;

        let potencia: i32 = row.get("potencia")?;

        Move::new(id, nombre, tipo, potencia).map_err(|e| conversion_failure(1, e))
    }

    fn select<P: Params>(conn: &Connection, filter: &str, params: P) -> AppResult<Vec<Move>> {
        let sql = format!(
            "SELECT id, nombre, tipo, potencia FROM movimiento {} ORDER BY orden",
            filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let moves = stmt
            .query_map(params, Self::row_to_move)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(moves)
    }

    fn query<P: Params>(&self, filter: &str, params: P) -> AppResult<Vec<Move>> {
        let conn = self.pool.get()?;
        Self::select(&conn, filter, params)
    }

    fn write(conn: &Connection, mv: &Move) -> AppResult<()> {
        mv.validate()?;
        conn.execute(
            &format!(
                "INSERT INTO movimiento (id, nombre, tipo, potencia, orden)
                 VALUES (?1, ?2, ?3, ?4, {})
                 ON CONFLICT(id) DO UPDATE SET
                    nombre = excluded.nombre,
                    tipo = excluded.tipo,
                    potencia = excluded.potencia",
                next_orden_sql("movimiento")
            ),
            params![mv.id().as_str(), mv.nombre(), mv.tipo().as_str(), mv.potencia()],
        )?;
        Ok(())
    }
}

impl Repository<Move> for SqliteMoveRepository {
    fn find_by_id(&self, id: &MoveId) -> AppResult<Option<Move>> {
        Ok(self
            .query("WHERE id = ?1", params![id.as_str()])?
            .into_iter()
            .next())
    }

    fn find_all(&self) -> AppResult<Vec<Move>> {
        self.query("", [])
    }

    fn save(&self, mv: &Move) -> AppResult<Move> {
        let conn = self.pool.get()?;
        Self::write(&conn, mv)?;
        Ok(mv.clone())
    }

    fn update(
        &self,
        id: &MoveId,
        apply: &mut dyn FnMut(&mut Move) -> AppResult<bool>,
    ) -> AppResult<bool> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut mv = Self::select(&tx, "WHERE id = ?1", params![id.as_str()])?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(Move::KIND, id))?;

        if !apply(&mut mv)? {
            return Ok(false);
        }

        Self::write(&tx, &mv)?;
        tx.commit()?;
        Ok(true)
    }

    fn delete_by_id(&self, id: &MoveId) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM movimiento WHERE id = ?1", params![id.as_str()])?;

        if deleted > 0 {
            log::debug!("Deleted Movimiento {}", id);
        }
        Ok(deleted > 0)
    }

    fn delete_all(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM movimiento", [])?;
        Ok(())
    }

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM movimiento", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl MoveRepository for SqliteMoveRepository {
    fn find_by_tipo(&self, tipo: Category) -> AppResult<Vec<Move>> {
        self.query("WHERE tipo = ?1", params![tipo.as_str()])
    }

    fn count_by_tipo(&self) -> AppResult<BTreeMap<Category, usize>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT tipo, COUNT(*) FROM movimiento GROUP BY tipo")?;

        let counts = stmt
            .query_map([], |row| {
                let tipo: String = row.get(0)?;
                let tipo = tipo
                    .parse::<Category>()
                    .map_err(|e| conversion_failure(0, e))?;
                let count: i64 = row.get(1)?;
                Ok((tipo, count as usize))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(counts)
    }
}
