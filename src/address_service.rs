use crate::errors::AppError;
use crate::models::AddressResponse;
use crate::viacep_client::ViaCepClient;

/// Orchestrates CEP resolution: delegates to the ViaCEP client, interprets
/// the upstream "no such code" flag, and projects the record into the public
/// response shape.
#[derive(Clone)]
pub struct AddressService {
    cep_integration: ViaCepClient,
}

impl AddressService {
    pub fn new(cep_integration: ViaCepClient) -> Self {
        Self { cep_integration }
    }

    /// Resolves a CEP to an address.
    ///
    /// A record with the upstream error flag set means no address exists for
    /// the code and fails with a not-found error; a partially-populated
    /// response is never returned. All other client failures propagate
    /// untouched.
    pub async fn get_address_by_cep(&self, cep: &str) -> Result<AddressResponse, AppError> {
        let record = self.cep_integration.get_address_by_cep(cep).await?;

        if record.erro.unwrap_or(false) {
            tracing::warn!("ViaCEP returned the erro flag for CEP {}", cep);
            return Err(AppError::NotFound(format!(
                "No address found for CEP {}",
                cep
            )));
        }

        Ok(AddressResponse::from(record))
    }
}
