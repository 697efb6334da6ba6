//! Test helpers.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use jobrpc_app::{
    auth::{
        Authenticator, AuthenticatorSettings, AuthorizationGate, identity::GroupSet,
        secrets::SecretHasher, store::MockCredentialStore, testing::CredentialFixture,
    },
    context::AppContext,
    domain::jobs::{MockJobsService, records::{JobRecord, JobUuid}},
    health::{HealthCheck, MockHealthCheck},
};
use salvo::{
    affix_state::inject,
    prelude::*,
    test::{RequestBuilder, TestClient},
};
use serde::Serialize;
use testresult::TestResult;

use crate::{jobs::descriptor::access_policy, router::app_router, state::State};

pub(crate) const WRITER_KEY: &str = "writer";
pub(crate) const WRITER_SECRET: &str = "s1";

pub(crate) fn fixture(key: &str, secret: &str, groups: &[&str]) -> CredentialFixture {
    CredentialFixture::new(&SecretHasher::insecure_for_tests(), key, secret, groups)
        .unwrap_or_else(|error| unreachable!("{error}"))
}

/// Store that knows exactly one client.
pub(crate) fn store_for(fixture: &CredentialFixture) -> MockCredentialStore {
    let mut store = MockCredentialStore::new();
    let key = fixture.client.api_key.clone();
    let secret_key = key.clone();
    let secrets = vec![fixture.secret.clone()];
    let client = fixture.client.clone();
    let client_uuid = fixture.client.uuid;
    let groups = fixture.groups.clone();

    store
        .expect_list_current_secrets()
        .returning(move |requested| {
            Ok(if *requested == secret_key {
                secrets.clone()
            } else {
                Vec::new()
            })
        });

    store
        .expect_find_active_client_by_key()
        .returning(move |requested| Ok((*requested == key).then(|| client.clone())));

    store.expect_list_group_names().returning(move |requested| {
        Ok(if requested == client_uuid {
            groups.clone()
        } else {
            GroupSet::new()
        })
    });

    store
}

pub(crate) fn headers_for(
    mut request: RequestBuilder,
    pairs: &[(&'static str, String)],
) -> RequestBuilder {
    for (name, value) in pairs {
        request = request.add_header(*name, value.as_str(), true);
    }

    request
}

fn strict_jobs_mock() -> MockJobsService {
    let mut jobs = MockJobsService::new();

    jobs.expect_create_job().never();
    jobs.expect_get_job().never();
    jobs.expect_list_jobs().never();
    jobs.expect_delete_job().never();

    jobs
}

fn strict_health_mock() -> MockHealthCheck {
    let mut health = MockHealthCheck::new();

    health.expect_check_database().never();

    health
}

fn make_state(
    store: MockCredentialStore,
    jobs: MockJobsService,
    health: impl HealthCheck + 'static,
) -> Arc<State> {
    let policy = Arc::new(access_policy().unwrap_or_else(|error| unreachable!("{error}")));
    let settings = AuthenticatorSettings {
        hasher: SecretHasher::insecure_for_tests(),
        ..AuthenticatorSettings::default()
    };

    State::from_app_context(AppContext {
        jobs: Arc::new(jobs),
        authenticator: Authenticator::new(Arc::new(store), Arc::clone(&policy), settings),
        gate: AuthorizationGate::new(policy),
        health: Arc::new(health),
    })
}

pub(crate) fn state_with_store(store: MockCredentialStore) -> Arc<State> {
    make_state(store, strict_jobs_mock(), strict_health_mock())
}

pub(crate) fn state_with_health(health: MockHealthCheck) -> Arc<State> {
    make_state(MockCredentialStore::new(), strict_jobs_mock(), health)
}

/// Full router whose credential store knows only `caller`.
pub(crate) fn service_for(caller: &CredentialFixture, jobs: MockJobsService) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(make_state(store_for(caller), jobs, strict_health_mock())))
            .push(app_router()),
    )
}

/// Full router with a caller holding both job groups.
pub(crate) fn writer_service(jobs: MockJobsService) -> Service {
    service_for(
        &fixture(WRITER_KEY, WRITER_SECRET, &["JobReader", "JobWriter"]),
        jobs,
    )
}

/// Signed POST of a JSON body to `path`, as the writer client.
pub(crate) fn signed_post(path: &str, body: &impl Serialize) -> TestResult<RequestBuilder> {
    let writer = fixture(WRITER_KEY, WRITER_SECRET, &[]);
    let headers = writer.signed_headers(path, Timestamp::now().as_second())?;

    Ok(headers_for(
        TestClient::post(format!("http://example.com{path}")),
        &headers,
    )
    .json(body))
}

pub(crate) fn make_job(uuid: JobUuid, name: &str) -> JobRecord {
    JobRecord::new(
        uuid,
        name.to_string(),
        format!("{name} description"),
        Timestamp::now() - SignedDuration::from_mins(5),
        None,
    )
    .unwrap_or_else(|error| unreachable!("{error}"))
}
