//! Provider scopes.
//!
//! Each provider declares its own closed set of scope identifiers. A
//! scope of one provider is never interchangeable with a scope of
//! another, even when the names look alike.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::provider::Provider;
use crate::error::GatewayError;

macro_rules! provider_scopes {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $id:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($id => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

provider_scopes! {
    /// Tax notice fields (DGFIP).
    DgfipScope {
        Declarant1Nom => "dgfip_declarant1_nom",
        Declarant1NomNaissance => "dgfip_declarant1_nom_naissance",
        Declarant1Prenoms => "dgfip_declarant1_prenoms",
        Declarant1DateNaissance => "dgfip_declarant1_date_naissance",
        Declarant2Nom => "dgfip_declarant2_nom",
        Declarant2NomNaissance => "dgfip_declarant2_nom_naissance",
        Declarant2Prenoms => "dgfip_declarant2_prenoms",
        Declarant2DateNaissance => "dgfip_declarant2_date_naissance",
        AdresseFiscaleTaxation => "dgfip_adresse_fiscale_taxation",
        DateRecouvrement => "dgfip_date_recouvrement",
        DateEtablissement => "dgfip_date_etablissement",
        NombreParts => "dgfip_nombre_parts",
        SituationFamiliale => "dgfip_situation_familiale",
        NombrePersonnesACharge => "dgfip_nombre_personnes_a_charge",
        RevenuBrutGlobal => "dgfip_rbg",
        RevenuImposable => "dgfip_revenu_imposable",
        ImpotRevenuNetAvantCorrections => "dgfip_irn",
        MontantImpot => "dgfip_montant_impot",
        RevenuFiscalReference => "dgfip_rfr",
        ErreurCorrectif => "dgfip_erreur_correctif",
        SituationPartielle => "dgfip_situation_partielle",
    }
}

provider_scopes! {
    /// Family benefits fields (CNAF).
    CnafScope {
        Adresse => "cnaf_adresse",
        Allocataires => "cnaf_allocataires",
        Enfants => "cnaf_enfants",
        QuotientFamilial => "cnaf_quotient_familial",
    }
}

provider_scopes! {
    /// Job seeker fields (Pôle emploi).
    PoleEmploiScope {
        Identite => "pole_emploi_identite",
        Adresse => "pole_emploi_adresse",
        Contact => "pole_emploi_contact",
        Inscription => "pole_emploi_inscription",
    }
}

provider_scopes! {
    /// Student enrolment fields (MESRI).
    MesriScope {
        Identifiant => "mesri_identifiant",
        Identite => "mesri_identite",
        Inscriptions => "mesri_inscriptions",
        Etablissements => "mesri_etablissements",
    }
}

/// A scope tagged with the provider it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scope {
    Dgfip(DgfipScope),
    Cnaf(CnafScope),
    PoleEmploi(PoleEmploiScope),
    Mesri(MesriScope),
}

impl Scope {
    pub fn provider(&self) -> Provider {
        match self {
            Scope::Dgfip(_) => Provider::Dgfip,
            Scope::Cnaf(_) => Provider::Cnaf,
            Scope::PoleEmploi(_) => Provider::PoleEmploi,
            Scope::Mesri(_) => Provider::Mesri,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Dgfip(s) => s.as_str(),
            Scope::Cnaf(s) => s.as_str(),
            Scope::PoleEmploi(s) => s.as_str(),
            Scope::Mesri(s) => s.as_str(),
        }
    }

    /// Parse a scope identifier of any provider.
    pub fn parse(s: &str) -> Option<Self> {
        DgfipScope::parse(s)
            .map(Scope::Dgfip)
            .or_else(|| CnafScope::parse(s).map(Scope::Cnaf))
            .or_else(|| PoleEmploiScope::parse(s).map(Scope::PoleEmploi))
            .or_else(|| MesriScope::parse(s).map(Scope::Mesri))
    }

    /// Every scope declared for `provider`.
    pub fn all_for(provider: Provider) -> Vec<Scope> {
        match provider {
            Provider::Dgfip => DgfipScope::ALL.iter().copied().map(Scope::Dgfip).collect(),
            Provider::Cnaf => CnafScope::ALL.iter().copied().map(Scope::Cnaf).collect(),
            Provider::PoleEmploi => PoleEmploiScope::ALL
                .iter()
                .copied()
                .map(Scope::PoleEmploi)
                .collect(),
            Provider::Mesri => MesriScope::ALL.iter().copied().map(Scope::Mesri).collect(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.as_str().to_owned()
    }
}

impl TryFrom<String> for Scope {
    type Error = GatewayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Scope::parse(&value)
            .ok_or_else(|| GatewayError::validation(format!("unknown scope: {value}")))
    }
}

impl From<DgfipScope> for Scope {
    fn from(scope: DgfipScope) -> Self {
        Scope::Dgfip(scope)
    }
}

impl From<CnafScope> for Scope {
    fn from(scope: CnafScope) -> Self {
        Scope::Cnaf(scope)
    }
}

impl From<PoleEmploiScope> for Scope {
    fn from(scope: PoleEmploiScope) -> Self {
        Scope::PoleEmploi(scope)
    }
}

impl From<MesriScope> for Scope {
    fn from(scope: MesriScope) -> Self {
        Scope::Mesri(scope)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identifiers_are_unique_across_providers() {
        let mut seen = HashSet::new();
        for provider in Provider::ALL {
            for scope in Scope::all_for(provider) {
                assert!(seen.insert(scope.as_str()), "duplicate scope {scope}");
                assert_eq!(scope.provider(), provider);
            }
        }
    }

    #[test]
    fn parse_roundtrips_every_identifier() {
        for provider in Provider::ALL {
            for scope in Scope::all_for(provider) {
                assert_eq!(Scope::parse(scope.as_str()), Some(scope));
            }
        }
        assert_eq!(Scope::parse("unknown_scope"), None);
    }

    #[test]
    fn serializes_as_bare_identifier() {
        let json = serde_json::to_string(&Scope::Cnaf(CnafScope::QuotientFamilial)).unwrap();
        assert_eq!(json, "\"cnaf_quotient_familial\"");

        let err = serde_json::from_str::<Scope>("\"cnaf_revenus\"");
        assert!(err.is_err());
    }
}
