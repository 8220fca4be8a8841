//! Scope registries.
//!
//! A [`ScopeRegistry`] maps each scope of one provider to the output
//! field paths it unlocks. The [`ScopeCatalog`] composes the registries
//! of every provider into a single lookup keyed by (provider, scope)
//! and is validated when it is built.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{GatewayError, GatewayResult};
use crate::models::field_path::FieldPath;
use crate::models::provider::Provider;
use crate::models::scope::{CnafScope, DgfipScope, MesriScope, PoleEmploiScope, Scope};

/// Scope → field paths table for one provider.
#[derive(Debug, Clone)]
pub struct ScopeRegistry {
    provider: Provider,
    entries: BTreeMap<Scope, Vec<FieldPath>>,
    problems: Vec<String>,
}

impl ScopeRegistry {
    pub fn builder(provider: Provider) -> Self {
        Self {
            provider,
            entries: BTreeMap::new(),
            problems: Vec::new(),
        }
    }

    /// Register the dotted field paths unlocked by `scope`.
    pub fn entry(mut self, scope: impl Into<Scope>, paths: &[&str]) -> Self {
        let scope = scope.into();
        let paths = paths.iter().map(|p| FieldPath::parse(p)).collect();
        if self.entries.insert(scope, paths).is_some() {
            self.problems.push(format!("{scope} registered twice"));
        }
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.entries.keys()
    }

    pub fn fields_for(&self, scope: &Scope) -> GatewayResult<&[FieldPath]> {
        self.entries
            .get(scope)
            .map(Vec::as_slice)
            .ok_or_else(|| GatewayError::UnknownScope {
                provider: self.provider,
                scope: scope.to_string(),
            })
    }

    /// Check the table is complete and well-formed: every scope the
    /// provider declares has a non-empty entry, every path has at least
    /// one segment and no entry belongs to another provider.
    pub fn validate(&self) -> GatewayResult<()> {
        let mut problems = self.problems.clone();

        for scope in Scope::all_for(self.provider) {
            match self.entries.get(&scope) {
                None => problems.push(format!("{scope} has no registry entry")),
                Some(paths) if paths.is_empty() => {
                    problems.push(format!("{scope} unlocks no field"));
                }
                Some(paths) if paths.iter().any(FieldPath::is_empty) => {
                    problems.push(format!("{scope} has an empty field path"));
                }
                Some(_) => {}
            }
        }
        for scope in self.entries.keys() {
            if scope.provider() != self.provider {
                problems.push(format!("{scope} belongs to {}", scope.provider()));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::validation(format!(
                "{} scope registry is invalid: {}",
                self.provider,
                problems.join("; ")
            )))
        }
    }

    pub fn dgfip() -> Self {
        use DgfipScope::*;

        Self::builder(Provider::Dgfip)
            .entry(Declarant1Nom, &["declarant1.nom"])
            .entry(Declarant1NomNaissance, &["declarant1.nomNaissance"])
            .entry(Declarant1Prenoms, &["declarant1.prenoms"])
            .entry(Declarant1DateNaissance, &["declarant1.dateNaissance"])
            .entry(Declarant2Nom, &["declarant2.nom"])
            .entry(Declarant2NomNaissance, &["declarant2.nomNaissance"])
            .entry(Declarant2Prenoms, &["declarant2.prenoms"])
            .entry(Declarant2DateNaissance, &["declarant2.dateNaissance"])
            .entry(AdresseFiscaleTaxation, &["foyerFiscal.adresse"])
            .entry(DateRecouvrement, &["dateRecouvrement"])
            .entry(DateEtablissement, &["dateEtablissement"])
            .entry(NombreParts, &["nombreParts"])
            .entry(SituationFamiliale, &["situationFamille"])
            .entry(NombrePersonnesACharge, &["nombrePersonnesCharge"])
            .entry(RevenuBrutGlobal, &["revenuBrutGlobal"])
            .entry(RevenuImposable, &["revenuImposable"])
            .entry(
                ImpotRevenuNetAvantCorrections,
                &["impotRevenuNetAvantCorrections"],
            )
            .entry(MontantImpot, &["montantImpot"])
            .entry(RevenuFiscalReference, &["revenuFiscalReference"])
            .entry(ErreurCorrectif, &["erreurCorrectif"])
            .entry(SituationPartielle, &["situationPartielle"])
    }

    pub fn cnaf() -> Self {
        Self::builder(Provider::Cnaf)
            .entry(CnafScope::Adresse, &["adresse"])
            .entry(CnafScope::Allocataires, &["allocataires"])
            .entry(CnafScope::Enfants, &["enfants"])
            .entry(CnafScope::QuotientFamilial, &["quotientFamilial", "mois", "annee"])
    }

    pub fn pole_emploi() -> Self {
        Self::builder(Provider::PoleEmploi)
            .entry(
                PoleEmploiScope::Identite,
                &[
                    "identifiant",
                    "civilite",
                    "nom",
                    "nomUsage",
                    "prenom",
                    "sexe",
                    "dateNaissance",
                ],
            )
            .entry(PoleEmploiScope::Adresse, &["adresse"])
            .entry(PoleEmploiScope::Contact, &["email", "telephone", "telephone2"])
            .entry(
                PoleEmploiScope::Inscription,
                &[
                    "dateInscription",
                    "dateCessationInscription",
                    "codeCertificationCNAV",
                    "codeCategorieInscription",
                    "libelleCategorieInscription",
                ],
            )
    }

    pub fn mesri() -> Self {
        Self::builder(Provider::Mesri)
            .entry(MesriScope::Identifiant, &["ine"])
            .entry(MesriScope::Identite, &["nom", "prenom", "dateNaissance"])
            .entry(
                MesriScope::Inscriptions,
                &[
                    "inscriptions.statut",
                    "inscriptions.regime",
                    "inscriptions.dateDebutInscription",
                    "inscriptions.dateFinInscription",
                    "inscriptions.codeCommune",
                ],
            )
            .entry(MesriScope::Etablissements, &["inscriptions.etablissement"])
    }
}

/// Every provider registry, composed into one lookup.
#[derive(Debug, Clone)]
pub struct ScopeCatalog {
    registries: BTreeMap<Provider, ScopeRegistry>,
}

impl ScopeCatalog {
    /// Compose and validate registries. Fails on an incomplete table or
    /// on two registries for the same provider.
    pub fn new(registries: impl IntoIterator<Item = ScopeRegistry>) -> GatewayResult<Self> {
        let mut composed = BTreeMap::new();
        for registry in registries {
            registry.validate()?;
            let provider = registry.provider();
            if composed.insert(provider, registry).is_some() {
                return Err(GatewayError::validation(format!(
                    "{provider} has more than one scope registry"
                )));
            }
        }
        debug!(providers = composed.len(), "Scope catalog validated");
        Ok(Self {
            registries: composed,
        })
    }

    /// The registries of every known provider.
    pub fn standard() -> GatewayResult<Self> {
        Self::new([
            ScopeRegistry::dgfip(),
            ScopeRegistry::cnaf(),
            ScopeRegistry::pole_emploi(),
            ScopeRegistry::mesri(),
        ])
    }

    pub fn registry(&self, provider: Provider) -> Option<&ScopeRegistry> {
        self.registries.get(&provider)
    }

    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        self.registries.keys().copied()
    }

    pub fn fields_for(&self, scope: &Scope) -> GatewayResult<&[FieldPath]> {
        self.registries
            .get(&scope.provider())
            .ok_or_else(|| GatewayError::UnknownScope {
                provider: scope.provider(),
                scope: scope.to_string(),
            })?
            .fields_for(scope)
    }

    /// Validate a raw scope identifier at grant time: it must name a
    /// registered scope of one of `subscriptions`.
    pub fn resolve_scope(
        &self,
        raw: &str,
        subscriptions: &BTreeSet<Provider>,
    ) -> GatewayResult<Scope> {
        let scope = Scope::parse(raw)
            .filter(|s| self.fields_for(s).is_ok())
            .ok_or_else(|| GatewayError::validation(format!("unknown scope: {raw}")))?;
        if !subscriptions.contains(&scope.provider()) {
            return Err(GatewayError::validation(format!(
                "scope {scope} requires a subscription to {}",
                scope.provider()
            )));
        }
        Ok(scope)
    }
}
