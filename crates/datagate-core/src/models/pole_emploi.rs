//! Pôle emploi (job seeker) provider DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoleEmploiInput {
    pub identifiant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoleEmploiAddress {
    pub code_postal: String,
    #[serde(rename = "INSEECommune")]
    pub insee_commune: String,
    pub localite: String,
    pub ligne_voie: Option<String>,
    pub ligne_complement_destinataire: Option<String>,
    pub ligne_complement_adresse: Option<String>,
    pub ligne_complement_distribution: Option<String>,
    pub ligne_nom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoleEmploiOutput {
    pub identifiant: String,
    pub civilite: Option<String>,
    pub nom: String,
    pub nom_usage: Option<String>,
    pub prenom: String,
    pub sexe: String,
    pub date_naissance: String,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub telephone2: Option<String>,
    pub adresse: PoleEmploiAddress,
    pub date_inscription: String,
    pub date_cessation_inscription: Option<String>,
    #[serde(rename = "codeCertificationCNAV")]
    pub code_certification_cnav: Option<String>,
    pub code_categorie_inscription: u32,
    pub libelle_categorie_inscription: String,
}
