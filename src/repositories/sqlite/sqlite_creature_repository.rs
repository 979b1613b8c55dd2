// src/repositories/sqlite/sqlite_creature_repository.rs
//
// Creature persistence on SQLite (`pokemon` + `pokemon_movimiento`)

use std::collections::BTreeMap;
use std::sync::Arc;

use rusqlite::{params, Connection, Params, Row, TransactionBehavior};

use crate::db::ConnectionPool;
use crate::domain::{Category, Creature, Entity, MoveId, PokedexNumber};
use crate::error::{AppError, AppResult};
use crate::repositories::sqlite::{conversion_failure, next_orden_sql};
use crate::repositories::traits::{CreatureRepository, Repository};

const SELECT_POKEMON: &str = "SELECT pokedex_number, nombre, tipo FROM pokemon";

pub struct SqliteCreatureRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCreatureRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Scalar columns only; attached moves come from the join table
    fn row_to_parts(row: &Row) -> rusqlite::Result<(PokedexNumber, String, Category)> {
        let number: String = row.get(0)?;
        let number = PokedexNumber::parse(number).map_err(|e| conversion_failure(0, e))?;

        let nombre: String = row.get(1)?;

        let tipo: String = row.get(2)?;
        let tipo = tipo
            .parse::<Category>()
            .map_err(|e| conversion_failure(2, e))?;

        Ok((number, nombre, tipo))
    }

    fn move_ids_of(conn: &Connection, number: &PokedexNumber) -> AppResult<Vec<MoveId>> {
        let mut stmt = conn.prepare(
            "SELECT movimiento_id FROM pokemon_movimiento
             WHERE pokedex_number = ?1
             ORDER BY posicion",
        )?;

        let ids = stmt
            .query_map(params![number.as_str()], |row| {
                let id: String = row.get(0)?;
                MoveId::parse(id).map_err(|e| conversion_failure(0, e))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Run `SELECT_POKEMON` with an optional WHERE clause, in insertion order
    fn select<P: Params>(conn: &Connection, filter: &str, params: P) -> AppResult<Vec<Creature>> {
        let sql = format!("{} {} ORDER BY orden", SELECT_POKEMON, filter);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_parts)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut creatures = Vec::with_capacity(rows.len());
        for (number, nombre, tipo) in rows {
            let moves = Self::move_ids_of(conn, &number)?;
            creatures.push(Creature::with_moves(number, nombre, tipo, moves)?);
        }
        Ok(creatures)
    }

    fn query<P: Params>(&self, filter: &str, params: P) -> AppResult<Vec<Creature>> {
        let conn = self.pool.get()?;
        Self::select(&conn, filter, params)
    }

    /// Upsert the row and rewrite its attached moves; caller owns the transaction
    fn write(conn: &Connection, creature: &Creature) -> AppResult<()> {
        creature.validate()?;
        let number = creature.pokedex_number().as_str();

        conn.execute(
            &format!(
                "INSERT INTO pokemon (pokedex_number, nombre, tipo, orden)
                 VALUES (?1, ?2, ?3, {})
                 ON CONFLICT(pokedex_number) DO UPDATE SET
                    nombre = excluded.nombre,
                    tipo = excluded.tipo",
                next_orden_sql("pokemon")
            ),
            params![number, creature.nombre(), creature.tipo().as_str()],
        )?;

        conn.execute(
            "DELETE FROM pokemon_movimiento WHERE pokedex_number = ?1",
            params![number],
        )?;
        let mut stmt = conn.prepare(
            "INSERT INTO pokemon_movimiento (pokedex_number, movimiento_id, posicion)
             VALUES (?1, ?2, ?3)",
        )?;
        for (posicion, move_id) in creature.movimiento_ids().iter().enumerate() {
            stmt.execute(params![number, move_id.as_str(), posicion as i64])?;
        }
        Ok(())
    }
}

impl Repository<Creature> for SqliteCreatureRepository {
    fn find_by_id(&self, id: &PokedexNumber) -> AppResult<Option<Creature>> {
        Ok(self
            .query("WHERE pokedex_number = ?1", params![id.as_str()])?
            .into_iter()
            .next())
    }

    fn find_all(&self) -> AppResult<Vec<Creature>> {
        self.query("", [])
    }

    fn save(&self, creature: &Creature) -> AppResult<Creature> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        Self::write(&tx, creature)?;
        tx.commit()?;
        Ok(creature.clone())
    }

    fn update(
        &self,
        id: &PokedexNumber,
        apply: &mut dyn FnMut(&mut Creature) -> AppResult<bool>,
    ) -> AppResult<bool> {
        let mut conn = self.pool.get()?;
        // IMMEDIATE takes the write lock before the read
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut creature = Self::select(&tx, "WHERE pokedex_number = ?1", params![id.as_str()])?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(Creature::KIND, id))?;

        if !apply(&mut creature)? {
            return Ok(false);
        }

        Self::write(&tx, &creature)?;
        tx.commit()?;
        Ok(true)
    }

    fn delete_by_id(&self, id: &PokedexNumber) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let deleted = conn.execute(
            "DELETE FROM pokemon WHERE pokedex_number = ?1",
            params![id.as_str()],
        )?;

        if deleted > 0 {
            log::debug!("Deleted Pokemon {}", id);
        }
        Ok(deleted > 0)
    }

    fn delete_all(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM pokemon", [])?;
        Ok(())
    }

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pokemon", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn exists_by_id(&self, id: &PokedexNumber) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM pokemon WHERE pokedex_number = ?1)",
            params![id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl CreatureRepository for SqliteCreatureRepository {
    fn find_by_tipo(&self, tipo: Category) -> AppResult<Vec<Creature>> {
        self.query("WHERE tipo = ?1", params![tipo.as_str()])
    }

    fn find_by_move_id(&self, move_id: &MoveId) -> AppResult<Vec<Creature>> {
        self.query(
            "WHERE pokedex_number IN (
                SELECT pokedex_number FROM pokemon_movimiento WHERE movimiento_id = ?1
             )",
            params![move_id.as_str()],
        )
    }

    fn count_by_tipo(&self) -> AppResult<BTreeMap<Category, usize>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT tipo, COUNT(*) FROM pokemon GROUP BY tipo")?;

        let rows = stmt
            .query_map([], |row| {
                let tipo: String = row.get(0)?;
                let tipo = tipo
                    .parse::<Category>()
                    .map_err(|e| conversion_failure(0, e))?;
                let count: i64 = row.get(1)?;
                Ok((tipo, count as usize))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::sqlite::test_support::test_pool;

    fn creature(number: &str, nombre: &str, tipo: Category) -> Creature {
        Creature::new(PokedexNumber::parse(number).unwrap(), nombre, tipo).unwrap()
    }

    #[test]
    fn test_save_and_find_with_moves_in_order() {
        let (_dir, pool) = test_pool();
        let repo = SqliteCreatureRepository::new(pool);

        let mut bulbasaur = creature("001", "Bulbasaur", Category::Grass);
        bulbasaur.add_move(MoveId::parse("GR0002").unwrap());
        bulbasaur.add_move(MoveId::parse("GR0001").unwrap());
        repo.save(&bulbasaur).unwrap();

        let found = repo
            .find_by_id(&PokedexNumber::parse("001").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found.nombre(), "Bulbasaur");
        assert_eq!(
            found.movimiento_ids(),
            &[MoveId::parse("GR0002").unwrap(), MoveId::parse("GR0001").unwrap()]
        );
    }

    #[test]
    fn test_upsert_keeps_position() {
        let (_dir, pool) = test_pool();
        let repo = SqliteCreatureRepository::new(pool);

        repo.save(&creature("001", "Bulbasaur", Category::Grass)).unwrap();
        repo.save(&creature("004", "Charmander", Category::Fire)).unwrap();
        repo.save(&creature("001", "Bulba", Category::Grass)).unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].nombre(), "Bulba");
        assert_eq!(all[1].nombre(), "Charmander");
    }

    #[test]
    fn test_delete_removes_join_rows() {
        let (_dir, pool) = test_pool();
        let repo = SqliteCreatureRepository::new(Arc::clone(&pool));

        let mut pikachu = creature("025", "Pikachu", Category::Electric);
        pikachu.add_move(MoveId::parse("EL0001").unwrap());
        repo.save(&pikachu).unwrap();

        assert!(repo.delete_by_id(&PokedexNumber::parse("025").unwrap()).unwrap());
        assert!(!repo.delete_by_id(&PokedexNumber::parse("025").unwrap()).unwrap());

        let conn = pool.get().unwrap();
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM pokemon_movimiento", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_native_filters() {
        let (_dir, pool) = test_pool();
        let repo = SqliteCreatureRepository::new(pool);

        let mut bulbasaur = creature("001", "Bulbasaur", Category::Grass);
        bulbasaur.add_move(MoveId::parse("GR0001").unwrap());
        repo.save(&bulbasaur).unwrap();
        repo.save(&creature("002", "Ivysaur", Category::Grass)).unwrap();
        repo.save(&creature("025", "Pikachu", Category::Electric)).unwrap();

        assert_eq!(repo.find_by_tipo(Category::Grass).unwrap().len(), 2);
        assert_eq!(repo.find_by_nombre_prefix("ivy").unwrap().len(), 1);
        assert_eq!(
            repo.find_by_move_id(&MoveId::parse("GR0001").unwrap())
                .unwrap()[0]
                .nombre(),
            "Bulbasaur"
        );
        assert_eq!(repo.count().unwrap(), 3);
        assert!(repo.exists_by_id(&PokedexNumber::parse("002").unwrap()).unwrap());

        let counts = repo.count_by_tipo().unwrap();
        assert_eq!(counts.get(&Category::Grass), Some(&2));
        assert_eq!(counts.get(&Category::Electric), Some(&1));

        repo.delete_all().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }
}
