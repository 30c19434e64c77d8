//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use personnel_core::{
  person::{NewPerson, Person},
  store::{PersonStore, StoreError as _},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_person(prenom: &str, nom: &str, email: &str) -> NewPerson {
  NewPerson {
    name:          format!("{prenom} {nom}"),
    age:           30,
    nom:           nom.into(),
    prenom:        prenom.into(),
    email:         email.into(),
    telephone:     None,
    poste:         None,
    departement:   None,
    date_embauche: None,
  }
}

fn in_dept(mut p: NewPerson, departement: &str, poste: &str) -> NewPerson {
  p.departement = Some(departement.into());
  p.poste = Some(poste.into());
  p
}

async fn seed(s: &SqliteStore, n: usize) -> Vec<Person> {
  let mut out = Vec::with_capacity(n);
  for i in 0..n {
    let p = new_person(&format!("P{i}"), "Seed", &format!("p{i}@example.com"));
    out.push(s.create(p).await.unwrap());
  }
  out
}

fn ids(persons: &[Person]) -> Vec<i64> { persons.iter().map(|p| p.id).collect() }

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_positive_id_and_round_trips() {
  let s = store().await;

  let mut input = new_person("Alice", "Liddell", "alice@example.com");
  input.telephone = Some("0600000000".into());
  input.date_embauche = NaiveDate::from_ymd_opt(2021, 6, 1);

  let created = s.create(input.clone()).await.unwrap();
  assert!(created.id > 0);
  assert_eq!(created, input.into_person(created.id));

  let fetched = s.find_by_id(created.id).await.unwrap();
  assert_eq!(fetched, Some(created));
}

#[tokio::test]
async fn find_by_id_missing_returns_none() {
  let s = store().await;
  assert_eq!(s.find_by_id(4242).await.unwrap(), None);
}

#[tokio::test]
async fn find_all_is_newest_first() {
  let s = store().await;
  let created = seed(&s, 3).await;

  let all = s.find_all().await.unwrap();
  let mut expected = ids(&created);
  expected.reverse();
  assert_eq!(ids(&all), expected);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
  let s = store().await;
  let first = seed(&s, 2).await;
  s.delete(first[1].id).await.unwrap();

  let next = s
    .create(new_person("Late", "Comer", "late@example.com"))
    .await
    .unwrap();
  assert!(next.id > first[1].id);
}

// ─── Pagination ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn pagination_matches_find_all_order() {
  let s = store().await;
  seed(&s, 5).await;

  let all = s.find_all().await.unwrap();
  let page = s.find_with_pagination(1, 10).await.unwrap();
  assert_eq!(ids(&page), ids(&all));
}

#[tokio::test]
async fn pagination_slices_pages() {
  let s = store().await;
  seed(&s, 5).await;
  let all = s.find_all().await.unwrap();

  let p1 = s.find_with_pagination(1, 2).await.unwrap();
  let p2 = s.find_with_pagination(2, 2).await.unwrap();
  let p3 = s.find_with_pagination(3, 2).await.unwrap();
  assert_eq!(ids(&p1), ids(&all[0..2]));
  assert_eq!(ids(&p2), ids(&all[2..4]));
  assert_eq!(ids(&p3), ids(&all[4..5]));
}

#[tokio::test]
async fn pagination_past_the_end_is_empty() {
  let s = store().await;
  seed(&s, 5).await;
  assert!(s.find_with_pagination(2, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn pagination_with_huge_offset_is_empty() {
  let s = store().await;
  seed(&s, 3).await;
  assert!(s.find_with_pagination(u32::MAX, u32::MAX).await.unwrap().is_empty());
  assert!(s.find_with_pagination(u32::MAX, 1).await.unwrap().is_empty());
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_by_name_matches_any_name_field_ignoring_case() {
  let s = store().await;
  let alice = s
    .create(new_person("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();
  let bob = s
    .create(new_person("Bob", "Alison", "bob@example.com"))
    .await
    .unwrap();
  s.create(new_person("Carol", "King", "carol@example.com"))
    .await
    .unwrap();

  let hits = s.find_by_name("ALI").await.unwrap();
  assert_eq!(ids(&hits), vec![bob.id, alice.id]);

  let hits = s.find_by_name("iddel").await.unwrap();
  assert_eq!(ids(&hits), vec![alice.id]);

  assert!(s.find_by_name("zed").await.unwrap().is_empty());
}

#[tokio::test]
async fn find_by_name_treats_wildcards_literally() {
  let s = store().await;
  s.create(new_person("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();

  assert!(s.find_by_name("%").await.unwrap().is_empty());
  assert!(s.find_by_name("A_ice").await.unwrap().is_empty());
}

#[tokio::test]
async fn departement_queries_are_exact() {
  let s = store().await;
  let a = s
    .create(in_dept(new_person("A", "A", "a@example.com"), "Finance", "Analyst"))
    .await
    .unwrap();
  s.create(in_dept(new_person("B", "B", "b@example.com"), "finance", "Clerk"))
    .await
    .unwrap();
  s.create(new_person("C", "C", "c@example.com")).await.unwrap();

  assert_eq!(ids(&s.find_by_departement("Finance").await.unwrap()), vec![a.id]);
  assert!(s.find_by_departement("Fin").await.unwrap().is_empty());
  assert_eq!(s.count_by_departement("Finance").await.unwrap(), 1);
  assert_eq!(s.count_by_departement("Nowhere").await.unwrap(), 0);
}

#[tokio::test]
async fn distinct_departements_and_postes_are_sorted() {
  let s = store().await;
  s.create(in_dept(new_person("A", "A", "a@example.com"), "Sales", "Rep"))
    .await
    .unwrap();
  s.create(in_dept(new_person("B", "B", "b@example.com"), "Finance", "Analyst"))
    .await
    .unwrap();
  s.create(in_dept(new_person("C", "C", "c@example.com"), "Sales", "Manager"))
    .await
    .unwrap();
  s.create(new_person("D", "D", "d@example.com")).await.unwrap();

  assert_eq!(s.all_departements().await.unwrap(), vec!["Finance", "Sales"]);
  assert_eq!(s.all_postes().await.unwrap(), vec!["Analyst", "Manager", "Rep"]);
}

#[tokio::test]
async fn count_tracks_rows() {
  let s = store().await;
  assert_eq!(s.count().await.unwrap(), 0);
  let created = seed(&s, 3).await;
  assert_eq!(s.count().await.unwrap(), 3);
  s.delete(created[0].id).await.unwrap();
  assert_eq!(s.count().await.unwrap(), 2);
}

// ─── Email uniqueness ────────────────────────────────────────────────────────

#[tokio::test]
async fn email_existence_ignores_case() {
  let s = store().await;
  let alice = s
    .create(new_person("Alice", "Liddell", "Alice@Example.com"))
    .await
    .unwrap();

  assert!(s.exists_by_email("alice@example.com").await.unwrap());
  assert!(s.exists_by_email("ALICE@EXAMPLE.COM").await.unwrap());
  assert!(!s.exists_by_email("bob@example.com").await.unwrap());

  assert!(!s.exists_by_email_excluding_id("alice@example.com", alice.id).await.unwrap());
  assert!(s.exists_by_email_excluding_id("alice@example.com", alice.id + 1).await.unwrap());
}

#[tokio::test]
async fn unique_constraint_rejects_case_variant_duplicates() {
  let s = store().await;
  s.create(new_person("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();

  let err = s
    .create(new_person("Alias", "Liddell", "ALICE@example.com"))
    .await
    .unwrap_err();
  assert_eq!(
    err.as_core(),
    Some(&personnel_core::Error::EmailTaken("ALICE@example.com".into()))
  );
  assert_eq!(s.count().await.unwrap(), 1);
}

// ─── Update / delete ─────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_all_mutable_columns() {
  let s = store().await;
  let mut alice = s
    .create(in_dept(new_person("Alice", "Liddell", "alice@example.com"), "R&D", "Dev"))
    .await
    .unwrap();

  alice.age = 31;
  alice.poste = None;
  alice.date_embauche = NaiveDate::from_ymd_opt(2020, 1, 2);
  s.update(&alice).await.unwrap();

  assert_eq!(s.find_by_id(alice.id).await.unwrap(), Some(alice));
}

#[tokio::test]
async fn update_missing_row_is_not_found() {
  let s = store().await;
  let ghost = new_person("Ghost", "Person", "ghost@example.com").into_person(99);

  let err = s.update(&ghost).await.unwrap_err();
  assert_eq!(err.as_core(), Some(&personnel_core::Error::PersonNotFound(99)));
  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn update_into_taken_email_rolls_back() {
  let s = store().await;
  s.create(new_person("Alice", "Liddell", "alice@example.com"))
    .await
    .unwrap();
  let bob = s
    .create(new_person("Bob", "Martin", "bob@example.com"))
    .await
    .unwrap();

  let mut clash = bob.clone();
  clash.email = "Alice@example.com".into();
  clash.age = 99;
  let err = s.update(&clash).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(personnel_core::Error::EmailTaken(ref e)) if e == "Alice@example.com"
  ));

  assert_eq!(s.find_by_id(bob.id).await.unwrap(), Some(bob));
}

#[tokio::test]
async fn delete_absent_id_is_a_no_op() {
  let s = store().await;
  seed(&s, 1).await;
  s.delete(12345).await.unwrap();
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn delete_removes_row() {
  let s = store().await;
  let created = seed(&s, 2).await;
  s.delete(created[0].id).await.unwrap();
  assert_eq!(s.find_by_id(created[0].id).await.unwrap(), None);
  assert!(s.find_by_id(created[1].id).await.unwrap().is_some());
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn closed_store_rejects_calls_from_clones() {
  let s = store().await;
  let clone = s.clone();
  s.close().await.unwrap();

  let err = clone.count().await.unwrap_err();
  assert!(matches!(err, Error::Database(_)), "got {err:?}");
}
