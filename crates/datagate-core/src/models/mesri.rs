//! MESRI (student enrolment) provider DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MesriInput {
    pub ine: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MesriEtablissement {
    pub uai: String,
    pub nom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MesriInscription {
    pub statut: String,
    pub regime: String,
    pub date_debut_inscription: String,
    pub date_fin_inscription: String,
    pub code_commune: Option<String>,
    pub etablissement: MesriEtablissement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MesriOutput {
    pub ine: String,
    pub nom: String,
    pub prenom: String,
    pub date_naissance: String,
    pub inscriptions: Vec<MesriInscription>,
}
