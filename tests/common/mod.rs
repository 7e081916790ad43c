//! Shared setup for tests against the mock services

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use apiprobe::checks::{CheckContext, CheckOptions, get_check};
use apiprobe::client::{ApiClient, SuperheroClient, UserClient};
use apiprobe::wait::WaitContract;
use apiprobe_testkit::{MockPetstore, MockServer, MockSuperheroApi};

/// Read lag of the mock services
pub const LAG: Duration = Duration::from_millis(100);

pub fn contract() -> WaitContract {
    WaitContract::new(Duration::from_secs(3), Duration::from_millis(25)).unwrap()
}

/// Both mock services, served, with a check context pointing at them
pub struct Harness {
    pub ctx: CheckContext,
    pub superhero: MockSuperheroApi,
    pub petstore: MockPetstore,
    _servers: (MockServer, MockServer),
}

impl Harness {
    pub async fn start(superhero: MockSuperheroApi, petstore: MockPetstore) -> Self {
        Self::start_with(superhero, petstore, contract()).await
    }

    pub async fn lagged() -> Self {
        Self::start(
            MockSuperheroApi::new().with_lag(LAG),
            MockPetstore::with_lag(LAG),
        )
        .await
    }

    pub async fn start_with(
        superhero: MockSuperheroApi,
        petstore: MockPetstore,
        wait: WaitContract,
    ) -> Self {
        let superhero_server = superhero.start().await.unwrap();
        let petstore_server = petstore.start().await.unwrap();

        let superhero_api = ApiClient::new(&superhero_server.base_url())
            .unwrap()
            .with_name("superhero");
        let petstore_api = ApiClient::new(&format!("{}v2/", petstore_server.base_url()))
            .unwrap()
            .with_name("petstore");

        let ctx = CheckContext::new(
            Arc::new(SuperheroClient::new(superhero_api, wait)),
            Arc::new(UserClient::new(petstore_api, wait)),
            wait,
        );

        Self {
            ctx,
            superhero,
            petstore,
            _servers: (superhero_server, petstore_server),
        }
    }
}

/// Options a check runs with by default, plus overrides
pub fn options(check: &str, overrides: &[(&str, bool)]) -> CheckOptions {
    let check = get_check(check).unwrap();
    overrides
        .iter()
        .fold(check.default_options(), |opts, (key, value)| {
            opts.with_extra(*key, *value)
        })
}
