use serde::{Deserialize, Serialize};

/// Raw address record as returned by the ViaCEP API.
///
/// When the CEP does not exist, ViaCEP answers 200 with `{"erro": true}` and
/// no address fields, so every field must tolerate absence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CepRecord {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    /// Set by the upstream when no address exists for the requested code.
    #[serde(default)]
    pub erro: Option<bool>,
}

/// Public-facing projection of a `CepRecord`, returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub zip_code: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl From<CepRecord> for AddressResponse {
    fn from(record: CepRecord) -> Self {
        Self {
            zip_code: record.cep,
            street: record.logradouro,
            neighborhood: record.bairro,
            city: record.localidade,
            state: record.uf,
        }
    }
}

/// Uniform error body returned on any failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub message: String,
    pub trace_id: String,
}
