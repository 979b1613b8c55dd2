// src/repositories/json_repository.rs
//
// Repositories over the Record Store (one JSON document per collection)

use crate::domain::{Creature, Entity, Move, Trainer};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{Collection, Mutation, RecordStore};
use crate::repositories::traits::{
    CreatureRepository, MoveRepository, Repository, TrainerRepository,
};

pub type JsonCreatureRepository = JsonRepository<Creature>;
pub type JsonMoveRepository = JsonRepository<Move>;
pub type JsonTrainerRepository = JsonRepository<Trainer>;

/// Generic repository for any entity stored in `<root>/<COLLECTION>.json`.
///
/// Every operation is a single load or a single locked read-modify-write, so
/// concurrent callers on the same collection never lose updates.
pub struct JsonRepository<E: Entity> {
    collection: Collection<E>,
}

impl<E: Entity> JsonRepository<E> {
    pub fn new(store: &RecordStore) -> AppResult<Self> {
        Ok(Self {
            collection: store.collection(E::COLLECTION)?,
        })
    }

    pub fn collection(&self) -> &Collection<E> {
        &self.collection
    }
}

impl<E: Entity> Repository<E> for JsonRepository<E> {
    fn find_by_id(&self, id: &E::Id) -> AppResult<Option<E>> {
        Ok(self
            .collection
            .load()?
            .into_iter()
            .find(|e| e.id() == id))
    }

    fn find_all(&self) -> AppResult<Vec<E>> {
        self.collection.load()
    }

    fn save(&self, entity: &E) -> AppResult<E> {
        entity.validate()?;
        self.collection.modify(|items| {
            match items.iter().position(|e| e.id() == entity.id()) {
                Some(index) => items[index] = entity.clone(),
                None => items.push(entity.clone()),
            }
            Ok(Mutation::Changed(entity.clone()))
        })
    }

    fn delete_by_id(&self, id: &E::Id) -> AppResult<bool> {
        let removed = self.collection.modify(|items| {
            let before = items.len();
            items.retain(|e| e.id() != id);
            if items.len() == before {
                Ok(Mutation::Unchanged(false))
            } else {
                Ok(Mutation::Changed(true))
            }
        })?;

        if removed {
            log::debug!("Deleted {} {}", E::KIND, id);
        }
        Ok(removed)
    }

    fn delete_all(&self) -> AppResult<()> {
        self.collection.save_all(&[])
    }

    fn update(
        &self,
        id: &E::Id,
        apply: &mut dyn FnMut(&mut E) -> AppResult<bool>,
    ) -> AppResult<bool> {
        self.collection.modify(|items| {
            let entity = items
                .iter_mut()
                .find(|e| e.id() == id)
                .ok_or_else(|| AppError::not_found(E::KIND, id))?;

            if apply(entity)? {
                entity.validate()?;
                Ok(Mutation::Changed(true))
            } else {
                Ok(Mutation::Unchanged(false))
            }
        })
    }

    fn count(&self) -> AppResult<usize> {
        Ok(self.collection.load()?.len())
    }
}

impl CreatureRepository for JsonRepository<Creature> {}

impl MoveRepository for JsonRepository<Move> {}

impl TrainerRepository for JsonRepository<Trainer> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, MoveId, PokedexNumber, Region, TrainerId};
    use crate::error::AppError;
    use tempfile::TempDir;

    fn creature(number: &str, nombre: &str, tipo: Category) -> Creature {
        Creature::new(PokedexNumber::parse(number).unwrap(), nombre, tipo).unwrap()
    }

    fn setup() -> (TempDir, RecordStore) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_upserts_in_place() {
        let (_dir, store) = setup();
        let repo = JsonCreatureRepository::new(&store).unwrap();

        repo.save(&creature("001", "Bulbasaur", Category::Grass)).unwrap();
        repo.save(&creature("004", "Charmander", Category::Fire)).unwrap();
        repo.save(&creature("001", "Bulbasaur Shiny", Category::Grass))
            .unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].nombre(), "Bulbasaur Shiny");
        assert_eq!(all[1].nombre(), "Charmander");
    }

    #[test]
    fn test_delete_absent_writes_nothing() {
        let (_dir, store) = setup();
        let repo = JsonCreatureRepository::new(&store).unwrap();
        repo.save(&creature("001", "Bulbasaur", Category::Grass)).unwrap();
        let backups_before = repo.collection().list_backups().unwrap().len();

        let removed = repo
            .delete_by_id(&PokedexNumber::parse("150").unwrap())
            .unwrap();

        assert!(!removed);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(
            repo.collection().list_backups().unwrap().len(),
            backups_before
        );
    }

    #[test]
    fn test_delete_present_and_delete_all() {
        let (_dir, store) = setup();
        let repo = JsonCreatureRepository::new(&store).unwrap();
        repo.save(&creature("001", "Bulbasaur", Category::Grass)).unwrap();
        repo.save(&creature("007", "Squirtle", Category::Water)).unwrap();

        assert!(repo.delete_by_id(&PokedexNumber::parse("001").unwrap()).unwrap());
        assert!(!repo.exists_by_id(&PokedexNumber::parse("001").unwrap()).unwrap());

        repo.delete_all().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_get_by_id_not_found() {
        let (_dir, store) = setup();
        let repo = JsonMoveRepository::new(&store).unwrap();

        let err = repo.get_by_id(&MoveId::parse("GR0001").unwrap()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_filters() {
        let (_dir, store) = setup();
        let repo = JsonCreatureRepository::new(&store).unwrap();
        let mut bulbasaur = creature("001", "Bulbasaur", Category::Grass);
        bulbasaur.add_move(MoveId::parse("GR0001").unwrap());
        repo.save(&bulbasaur).unwrap();
        repo.save(&creature("002", "Ivysaur", Category::Grass)).unwrap();
        repo.save(&creature("025", "Pikachu", Category::Electric)).unwrap();

        assert_eq!(repo.find_by_tipo(Category::Grass).unwrap().len(), 2);
        assert_eq!(repo.find_by_nombre_prefix("PIK").unwrap().len(), 1);
        assert_eq!(
            repo.find_by_move_id(&MoveId::parse("GR0001").unwrap())
                .unwrap()
                .len(),
            1
        );

        let counts = repo.count_by_tipo().unwrap();
        assert_eq!(counts.get(&Category::Grass), Some(&2));
        assert_eq!(counts.get(&Category::Electric), Some(&1));
        assert_eq!(counts.get(&Category::Water), None);
    }

    #[test]
    fn test_trainer_filters() {
        let (_dir, store) = setup();
        let repo = JsonTrainerRepository::new(&store).unwrap();
        let mut ash = Trainer::new(TrainerId::parse("12345678A").unwrap(), "Ash", Region::Kanto)
            .unwrap();
        ash.add_creature(PokedexNumber::parse("025").unwrap()).unwrap();
        repo.save(&ash).unwrap();
        repo.save(
            &Trainer::new(TrainerId::parse("87654321B").unwrap(), "Aura", Region::Alola).unwrap(),
        )
        .unwrap();

        assert_eq!(repo.find_by_region(Region::Kanto).unwrap().len(), 1);
        assert_eq!(repo.find_by_nombre_prefix("a").unwrap().len(), 2);
        assert_eq!(
            repo.find_by_creature(&PokedexNumber::parse("025").unwrap())
                .unwrap()[0]
                .nombre(),
            "Ash"
        );
        assert_eq!(repo.count_by_region().unwrap().get(&Region::Alola), Some(&1));
    }

    #[test]
    fn test_two_repositories_share_one_document() {
        let (_dir, store) = setup();
        let first = JsonMoveRepository::new(&store).unwrap();
        let second = JsonMoveRepository::new(&store).unwrap();

        let id = MoveId::parse("GR0001").unwrap();
        let latigo_cepa = Move::new(id, "Latigo Cepa", Category::Grass, 45).unwrap();
        first.save(&latigo_cepa).unwrap();

        assert_eq!(second.count().unwrap(), 1);
    }

    #[test]
    fn test_update_writes_only_on_change() {
        let (_dir, store) = setup();
        let repo = JsonCreatureRepository::new(&store).unwrap();
        repo.save(&creature("001", "Bulbasaur", Category::Grass)).unwrap();
        let number = PokedexNumber::parse("001").unwrap();
        let vine_whip = MoveId::parse("GR0001").unwrap();

        assert!(repo
            .update(&number, &mut |c| Ok(c.add_move(vine_whip.clone())))
            .unwrap());
        let backups_after_change = repo.collection().list_backups().unwrap().len();

        assert!(!repo
            .update(&number, &mut |c| Ok(c.add_move(vine_whip.clone())))
            .unwrap());
        assert_eq!(
            repo.collection().list_backups().unwrap().len(),
            backups_after_change
        );
        assert!(repo.get_by_id(&number).unwrap().has_move(&vine_whip));
    }

    #[test]
    fn test_update_error_aborts_and_absent_is_not_found() {
        let (_dir, store) = setup();
        let repo = JsonCreatureRepository::new(&store).unwrap();
        repo.save(&creature("004", "Charmander", Category::Fire)).unwrap();
        let number = PokedexNumber::parse("004").unwrap();

        let result = repo.update(&number, &mut |c| {
            c.add_move(MoveId::parse("FI0001").unwrap());
            Err(AppError::ConstraintViolation("rejected".to_string()))
        });
        assert!(matches!(result, Err(AppError::ConstraintViolation(_))));
        assert!(repo.get_by_id(&number).unwrap().movimiento_ids().is_empty());

        let missing = repo.update(&PokedexNumber::parse("150").unwrap(), &mut |_| Ok(true));
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_invalid_record_is_store_corruption() {
        let (dir, store) = setup();
        std::fs::write(
            dir.path().join("creatures.json"),
            r#"[{"pokedexNumber":"25","nombre":"Pikachu","tipo":"ELECTRIC","movimientoIds":[]}]"#,
        )
        .unwrap();
        let repo = JsonCreatureRepository::new(&store).unwrap();

        assert!(matches!(
            repo.find_all(),
            Err(AppError::StoreCorruption { .. })
        ));

        std::fs::write(
            dir.path().join("creatures.json"),
            r#"[{"pokedexNumber":"025","nombre":"  ","tipo":"ELECTRIC","movimientoIds":[]}]"#,
        )
        .unwrap();
        assert!(matches!(
            repo.find_all(),
            Err(AppError::StoreCorruption { .. })
        ));
    }

    #[test]
    fn test_oversized_team_is_store_corruption() {
        let (dir, store) = setup();
        std::fs::write(
            dir.path().join("trainers.json"),
            r#"[{"id":"12345678A","nombre":"Ash","region":"KANTO",
                "pokedexNumbers":["001","004","007","025","039","052","133"]}]"#,
        )
        .unwrap();
        let repo = JsonTrainerRepository::new(&store).unwrap();

        let err = repo
            .find_by_id(&TrainerId::parse("12345678A").unwrap())
            .unwrap_err();
        assert!(matches!(err, AppError::StoreCorruption { .. }));
    }
}
