/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use proptest::prelude::*;
use reqwest::StatusCode;

use rust_cep_api::cache_validator::ValidatedCacheEntry;
use rust_cep_api::models::{AddressResponse, CepRecord};
use rust_cep_api::pipeline::is_transient_status;

// Property: the public projection is a verbatim 1:1 copy of the upstream record
proptest! {
    #[test]
    fn address_projection_copies_fields_verbatim(
        cep in "[0-9]{8}",
        street in "\\PC{0,40}",
        neighborhood in "\\PC{0,40}",
        city in "\\PC{0,40}",
        state in "[A-Z]{2}"
    ) {
        let record = CepRecord {
            cep: cep.clone(),
            logradouro: street.clone(),
            bairro: neighborhood.clone(),
            localidade: city.clone(),
            uf: state.clone(),
            erro: None,
        };

        let response = AddressResponse::from(record);

        prop_assert_eq!(response.zip_code, cep);
        prop_assert_eq!(response.street, street);
        prop_assert_eq!(response.neighborhood, neighborhood);
        prop_assert_eq!(response.city, city);
        prop_assert_eq!(response.state, state);
    }

    #[test]
    fn projection_round_trips_through_json(
        cep in "[0-9]{8}",
        street in "\\PC{0,40}"
    ) {
        let record = CepRecord {
            cep,
            logradouro: street,
            ..CepRecord::default()
        };

        let response = AddressResponse::from(record);
        let json = serde_json::to_string(&response).unwrap();
        let parsed: AddressResponse = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(parsed, response);
    }
}

// Property: cache integrity validation
proptest! {
    #[test]
    fn fresh_cache_entries_are_always_valid(data in "\\PC*") {
        prop_assert!(ValidatedCacheEntry::new(data).is_valid());
    }

    #[test]
    fn any_data_change_fails_validation(data in "\\PC{1,64}", tampered in "\\PC{1,64}") {
        prop_assume!(data != tampered);

        let mut entry = ValidatedCacheEntry::new(data);
        entry.data = tampered;

        prop_assert!(!entry.is_valid());
    }
}

// Property: transient failure classification
proptest! {
    #[test]
    fn all_server_errors_are_transient(code in 500u16..=599u16) {
        let status = StatusCode::from_u16(code).unwrap();
        prop_assert!(is_transient_status(status));
    }

    #[test]
    fn client_errors_not_transient_except_retry_set(code in 400u16..=499u16) {
        let status = StatusCode::from_u16(code).unwrap();
        let in_retry_set = code == 408 || code == 429;
        prop_assert_eq!(is_transient_status(status), in_retry_set);
    }

    #[test]
    fn success_statuses_never_transient(code in 200u16..=299u16) {
        let status = StatusCode::from_u16(code).unwrap();
        prop_assert!(!is_transient_status(status));
    }
}
