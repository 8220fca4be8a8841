//! CNAF (family benefits) provider DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnafInput {
    pub code_postal: String,
    pub numero_allocataire: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnafPerson {
    pub nom_prenom: String,
    pub date_de_naissance: String,
    pub sexe: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnafAddress {
    pub identite: String,
    pub complement_identite: Option<String>,
    pub complement_identite_geo: Option<String>,
    pub numero_rue: Option<String>,
    pub lieu_dit: Option<String>,
    pub code_postal_ville: String,
    pub pays: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnafOutput {
    pub allocataires: Vec<CnafPerson>,
    pub enfants: Vec<CnafPerson>,
    pub adresse: CnafAddress,
    pub quotient_familial: i64,
    pub mois: u32,
    pub annee: i32,
}
