//! DGFIP (tax notice) provider DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DgfipInput {
    pub tax_number: String,
    pub tax_notice_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DgfipDeclarant {
    pub nom: String,
    pub nom_naissance: String,
    pub prenoms: String,
    pub date_naissance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DgfipFoyerFiscal {
    pub adresse: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DgfipOutput {
    pub declarant1: DgfipDeclarant,
    pub declarant2: Option<DgfipDeclarant>,
    pub foyer_fiscal: DgfipFoyerFiscal,
    pub date_recouvrement: String,
    pub date_etablissement: String,
    pub nombre_parts: String,
    pub situation_famille: String,
    pub nombre_personnes_charge: u32,
    pub revenu_brut_global: Option<i64>,
    pub revenu_imposable: Option<i64>,
    pub impot_revenu_net_avant_corrections: Option<i64>,
    pub montant_impot: Option<i64>,
    pub revenu_fiscal_reference: Option<i64>,
    pub erreur_correctif: Option<String>,
    pub situation_partielle: Option<String>,
}
