use opsdesk_core::db::open_db_in_memory;
use opsdesk_core::{
    CompanyService, ContactDraft, ContactService, ContactServiceError, RepoError,
    SqliteCompanyRepository, SqliteContactRepository,
};
use rusqlite::params;
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip_resolves_company_name() {
    let mut conn = open_db_in_memory().unwrap();

    let company = {
        let repo = SqliteCompanyRepository::new(&conn);
        let service = CompanyService::new(repo);
        service.create_company("Acme").unwrap()
    };

    let repo = SqliteContactRepository::new(&mut conn);
    let service = ContactService::new(repo);

    let created = service
        .create_contact(ContactDraft {
            name: "Jo Doe".to_string(),
            email: "jo@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            company_id: Some(company.id),
        })
        .unwrap();

    assert_eq!(created.name, "Jo Doe");
    assert_eq!(created.email, "jo@example.com");
    assert_eq!(created.phone.as_deref(), Some("+1 555 0100"));
    assert_eq!(created.company_id, Some(company.id));
    assert_eq!(created.company_name.as_deref(), Some("Acme"));
    assert!(created.tags.is_empty());

    let loaded = service.get_contact(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rejects_invalid_email() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&mut conn);
    let service = ContactService::new(repo);

    let err = service
        .create_contact(ContactDraft {
            name: "Jo".to_string(),
            email: "not-an-email".to_string(),
            ..ContactDraft::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ContactServiceError::Repo(RepoError::ContactValidation(_))
    ));
}

#[test]
fn update_replaces_all_draft_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&mut conn);
    let service = ContactService::new(repo);

    let created = service
        .create_contact(ContactDraft {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            company_id: None,
        })
        .unwrap();

    let updated = service
        .update_contact(
            created.id,
            ContactDraft {
                name: "Jo Doe".to_string(),
                email: "jo.doe@example.com".to_string(),
                phone: None,
                company_id: None,
            },
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Jo Doe");
    assert_eq!(updated.email, "jo.doe@example.com");
    assert_eq!(updated.phone, None);
}

#[test]
fn update_missing_contact_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&mut conn);
    let service = ContactService::new(repo);

    let missing = Uuid::new_v4();
    let err = service
        .update_contact(
            missing,
            ContactDraft {
                name: "Ghost".to_string(),
                email: "ghost@example.com".to_string(),
                ..ContactDraft::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ContactServiceError::ContactNotFound(id) if id == missing));
}

#[test]
fn set_contact_tags_replaces_full_set_with_lowercase_normalization() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&mut conn);
    let mut service = ContactService::new(repo);

    let created = service
        .create_contact(ContactDraft {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            ..ContactDraft::default()
        })
        .unwrap();

    let after_first = service
        .set_contact_tags(
            created.id,
            vec![
                "Lead".to_string(),
                "IMPORTANT".to_string(),
                "lead".to_string(),
            ],
        )
        .unwrap();
    assert_eq!(
        after_first.tags,
        vec!["important".to_string(), "lead".to_string()]
    );

    let after_replace = service
        .set_contact_tags(created.id, vec!["Customer".to_string()])
        .unwrap();
    assert_eq!(after_replace.tags, vec!["customer".to_string()]);

    let known = service.list_tags().unwrap();
    assert_eq!(
        known,
        vec![
            "customer".to_string(),
            "important".to_string(),
            "lead".to_string()
        ]
    );
}

#[test]
fn set_contact_tags_rejects_blank_tag_values() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&mut conn);
    let mut service = ContactService::new(repo);

    let created = service
        .create_contact(ContactDraft {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            ..ContactDraft::default()
        })
        .unwrap();

    let err = service
        .set_contact_tags(created.id, vec!["   ".to_string()])
        .unwrap_err();
    assert!(matches!(err, ContactServiceError::InvalidTag(_)));
}

#[test]
fn list_supports_single_tag_filter_and_stable_order() {
    let mut conn = open_db_in_memory().unwrap();

    let (lead_id, other_id) = {
        let repo = SqliteContactRepository::new(&mut conn);
        let mut service = ContactService::new(repo);
        let lead = service
            .create_contact(ContactDraft {
                name: "Lead Person".to_string(),
                email: "lead@example.com".to_string(),
                ..ContactDraft::default()
            })
            .unwrap();
        let other = service
            .create_contact(ContactDraft {
                name: "Other Person".to_string(),
                email: "other@example.com".to_string(),
                ..ContactDraft::default()
            })
            .unwrap();
        service
            .set_contact_tags(lead.id, vec!["Lead".to_string()])
            .unwrap();
        service
            .set_contact_tags(other.id, vec!["Customer".to_string()])
            .unwrap();
        (lead.id, other.id)
    };

    conn.execute(
        "UPDATE contacts SET updated_at = 2000 WHERE id = ?1;",
        params![lead_id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE contacts SET updated_at = 1000 WHERE id = ?1;",
        params![other_id.to_string()],
    )
    .unwrap();

    let repo = SqliteContactRepository::new(&mut conn);
    let service = ContactService::new(repo);

    let all = service.list_contacts(None, None, Some(10), 0).unwrap();
    assert_eq!(all.items.len(), 2);
    assert_eq!(all.items[0].id, lead_id);
    assert_eq!(all.items[1].id, other_id);

    let filtered = service
        .list_contacts(Some("LEAD".to_string()), None, Some(10), 0)
        .unwrap();
    assert_eq!(filtered.items.len(), 1);
    assert_eq!(filtered.items[0].id, lead_id);
}

#[test]
fn list_supports_company_filter() {
    let mut conn = open_db_in_memory().unwrap();

    let company = {
        let repo = SqliteCompanyRepository::new(&conn);
        let service = CompanyService::new(repo);
        service.create_company("Acme").unwrap()
    };

    let repo = SqliteContactRepository::new(&mut conn);
    let service = ContactService::new(repo);
    let inside = service
        .create_contact(ContactDraft {
            name: "Inside".to_string(),
            email: "inside@example.com".to_string(),
            phone: None,
            company_id: Some(company.id),
        })
        .unwrap();
    service
        .create_contact(ContactDraft {
            name: "Outside".to_string(),
            email: "outside@example.com".to_string(),
            ..ContactDraft::default()
        })
        .unwrap();

    let filtered = service
        .list_contacts(None, Some(company.id), Some(10), 0)
        .unwrap();
    assert_eq!(filtered.items.len(), 1);
    assert_eq!(filtered.items[0].id, inside.id);
}

#[test]
fn list_limit_defaults_to_10_and_caps_at_50() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&mut conn);
    let service = ContactService::new(repo);

    for idx in 0..60 {
        service
            .create_contact(ContactDraft {
                name: format!("Contact {idx}"),
                email: format!("contact{idx}@example.com"),
                ..ContactDraft::default()
            })
            .unwrap();
    }

    let defaulted = service.list_contacts(None, None, None, 0).unwrap();
    assert_eq!(defaulted.applied_limit, 10);
    assert_eq!(defaulted.items.len(), 10);

    let capped = service.list_contacts(None, None, Some(500), 0).unwrap();
    assert_eq!(capped.applied_limit, 50);
    assert_eq!(capped.items.len(), 50);
}

#[test]
fn delete_removes_contact_and_its_tag_links() {
    let mut conn = open_db_in_memory().unwrap();

    let contact_id = {
        let repo = SqliteContactRepository::new(&mut conn);
        let mut service = ContactService::new(repo);
        let created = service
            .create_contact(ContactDraft {
                name: "Jo".to_string(),
                email: "jo@example.com".to_string(),
                ..ContactDraft::default()
            })
            .unwrap();
        service
            .set_contact_tags(created.id, vec!["lead".to_string()])
            .unwrap();
        service.delete_contact(created.id).unwrap();

        let err = service.delete_contact(created.id).unwrap_err();
        assert!(matches!(err, ContactServiceError::ContactNotFound(id) if id == created.id));
        created.id
    };

    let links: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM contact_tags WHERE contact_id = ?1;",
            params![contact_id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(links, 0);
}
