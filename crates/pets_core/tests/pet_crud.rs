use pets_core::{
    Column, Gender, NewPet, PetPatch, PetQuery, PetRepository, PetRow, PetStore, RepoError,
    Selection, SortOrder, SqlitePetRepository,
};

#[test]
fn insert_and_query_roundtrip() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);

    let id = repo
        .insert_pet(
            &NewPet::new("Toto", 7)
                .with_breed("Terrier")
                .with_gender(Gender::Male),
        )
        .unwrap();

    let query = PetQuery {
        selection: Some(Selection::by_id(id)),
        ..PetQuery::default()
    };
    let pet = repo
        .query_pets(&query)
        .unwrap()
        .next()
        .and_then(PetRow::into_pet)
        .unwrap();
    assert_eq!(pet.id, id);
    assert_eq!(pet.name, "Toto");
    assert_eq!(pet.breed.as_deref(), Some("Terrier"));
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.weight, 7);
}

#[test]
fn identifiers_increase_with_each_insert() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);

    let first = repo.insert_pet(&NewPet::new("Rex", 12)).unwrap();
    let second = repo.insert_pet(&NewPet::new("Mia", 4)).unwrap();
    assert!(second > first);
}

#[test]
fn validation_failure_blocks_insert_and_update() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);

    let err = repo.insert_pet(&NewPet::new("Rex", 0)).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    repo.insert_pet(&NewPet::new("Rex", 5)).unwrap();
    let err = repo
        .update_pets(&PetPatch::new().weight(-1), None)
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let weights: Vec<_> = repo
        .query_pets(&PetQuery::default())
        .unwrap()
        .map(|row| row.weight)
        .collect();
    assert_eq!(weights, vec![Some(5)]);
}

#[test]
fn projection_reads_only_requested_columns() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);
    repo.insert_pet(&NewPet::new("Rex", 12).with_breed("Boxer"))
        .unwrap();

    let query = PetQuery {
        projection: Some(vec![Column::Name, Column::Weight]),
        ..PetQuery::default()
    };
    let row = repo.query_pets(&query).unwrap().next().unwrap();
    assert_eq!(
        row,
        PetRow {
            name: Some("Rex".to_string()),
            weight: Some(12),
            ..PetRow::default()
        }
    );
    assert!(row.into_pet().is_none());
}

#[test]
fn selection_binds_positional_arguments() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);
    repo.insert_pet(&NewPet::new("Rex", 12)).unwrap();
    repo.insert_pet(&NewPet::new("Mia", 4)).unwrap();
    repo.insert_pet(&NewPet::new("Bo", 30)).unwrap();

    let query = PetQuery {
        selection: Some(Selection::new("weight > ? AND weight < ?").arg(5).arg(31)),
        order_by: vec![SortOrder::desc(Column::Weight)],
        ..PetQuery::default()
    };
    let names: Vec<_> = repo
        .query_pets(&query)
        .unwrap()
        .filter_map(|row| row.name)
        .collect();
    assert_eq!(names, vec!["Bo".to_string(), "Rex".to_string()]);
}

#[test]
fn malformed_selection_is_a_store_error() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);

    let query = PetQuery {
        selection: Some(Selection::new("no_such_column = ?").arg(1)),
        ..PetQuery::default()
    };
    assert!(matches!(repo.query_pets(&query), Err(RepoError::Db(_))));
}

#[test]
fn update_clears_breed_and_leaves_other_fields() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);
    let id = repo
        .insert_pet(
            &NewPet::new("Rex", 12)
                .with_breed("Boxer")
                .with_gender(Gender::Male),
        )
        .unwrap();

    let changed = repo
        .update_pets(&PetPatch::new().breed(None), Some(&Selection::by_id(id)))
        .unwrap();
    assert_eq!(changed, 1);

    let pet = repo
        .query_pets(&PetQuery::default())
        .unwrap()
        .next()
        .and_then(PetRow::into_pet)
        .unwrap();
    assert_eq!(pet.breed, None);
    assert_eq!(pet.name, "Rex");
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.weight, 12);
}

#[test]
fn update_and_delete_report_zero_for_no_match() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);
    repo.insert_pet(&NewPet::new("Rex", 12)).unwrap();

    let missing = Selection::by_id(404);
    assert_eq!(
        repo.update_pets(&PetPatch::new().weight(3), Some(&missing))
            .unwrap(),
        0
    );
    assert_eq!(repo.delete_pets(Some(&missing)).unwrap(), 0);
}

#[test]
fn invalid_persisted_gender_is_rejected_on_read() {
    let store = PetStore::in_memory();
    store
        .connection()
        .unwrap()
        .execute(
            "INSERT INTO pets (name, gender, weight) VALUES ('Ghost', 9, 1);",
            [],
        )
        .unwrap();

    let repo = SqlitePetRepository::new(&store);
    assert!(matches!(
        repo.query_pets(&PetQuery::default()),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn rows_serialize_without_unprojected_columns() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);
    repo.insert_pet(&NewPet::new("Mia", 4).with_gender(Gender::Female))
        .unwrap();

    let query = PetQuery {
        projection: Some(vec![Column::Name, Column::Gender]),
        ..PetQuery::default()
    };
    let row = repo.query_pets(&query).unwrap().next().unwrap();
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json, serde_json::json!({ "name": "Mia", "gender": "female" }));
}

#[test]
fn blank_selection_matches_every_row() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);
    repo.insert_pet(&NewPet::new("Rex", 12)).unwrap();
    repo.insert_pet(&NewPet::new("Mia", 4)).unwrap();

    let query = PetQuery {
        selection: Some(Selection::new("   ")),
        ..PetQuery::default()
    };
    assert_eq!(repo.query_pets(&query).unwrap().len(), 2);

    let patch = PetPatch::new().weight(9);
    assert_eq!(repo.update_pets(&patch, Some(&Selection::new(""))).unwrap(), 2);
}

#[test]
fn numbered_and_named_placeholders_are_rejected_before_writing() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);
    let rex = repo.insert_pet(&NewPet::new("Rex", 12)).unwrap();
    let mia = repo.insert_pet(&NewPet::new("Mia", 4)).unwrap();

    let patch = PetPatch::new().weight(99);
    let numbered = Selection::new("_id = ?1").arg(mia);
    assert!(matches!(
        repo.update_pets(&patch, Some(&numbered)),
        Err(RepoError::InvalidSelection(_))
    ));

    let named = Selection::new("name = :name").arg("Mia".to_string());
    assert!(matches!(
        repo.delete_pets(Some(&named)),
        Err(RepoError::InvalidSelection(_))
    ));
    let query = PetQuery {
        selection: Some(Selection::new("weight > $min").arg(1)),
        ..PetQuery::default()
    };
    assert!(matches!(
        repo.query_pets(&query),
        Err(RepoError::InvalidSelection(_))
    ));

    let weights: Vec<_> = repo
        .query_pets(&PetQuery::default())
        .unwrap()
        .map(|row| (row.id.unwrap(), row.weight.unwrap()))
        .collect();
    assert_eq!(weights, vec![(rex, 12), (mia, 4)]);
}

#[test]
fn rows_report_exact_remaining_length() {
    let store = PetStore::in_memory();
    let repo = SqlitePetRepository::new(&store);
    repo.insert_pet(&NewPet::new("Rex", 12)).unwrap();
    repo.insert_pet(&NewPet::new("Mia", 4)).unwrap();

    let mut rows = repo.query_pets(&PetQuery::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(repo.delete_pets(None).unwrap(), 2);

    assert_eq!(rows.next().and_then(|row| row.name).as_deref(), Some("Rex"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.next().and_then(|row| row.name).as_deref(), Some("Mia"));
    assert!(rows.next().is_none());
}
