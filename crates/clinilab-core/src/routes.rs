//! Client-side route surface.
//!
//! Typed parse/format of the navigation paths the host shell uses. Two
//! conventions are load-bearing: a detail segment of `novo` means "create",
//! and `?edit=true` flips a detail page from view to edit mode.

/// Create-or-existing target of a detail route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    /// The `novo` segment: a creation form
    New,
    /// An existing record's ID
    Id(String),
}

impl RecordTarget {
    fn parse(segment: &str) -> Self {
        if segment == "novo" {
            RecordTarget::New
        } else {
            RecordTarget::Id(segment.to_string())
        }
    }

    fn segment(&self) -> &str {
        match self {
            RecordTarget::New => "novo",
            RecordTarget::Id(id) => id,
        }
    }
}

/// Application routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Atendimento,
    Caixa,
    CadastroConvenios,
    CadastroConvenio { target: RecordTarget, edit: bool },
    CadastroPacientes,
    CadastroPaciente { target: RecordTarget, edit: bool },
    LaboratorioAmostras,
    LaboratorioLotes,
    Faturamento,
    Seguranca,
}

impl Route {
    /// Parse a path (with optional query string) into a route.
    pub fn parse(raw: &str) -> Option<Route> {
        let (path, query) = match raw.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (raw, None),
        };
        let edit = query.is_some_and(has_edit_flag);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["atendimento"] => Some(Route::Atendimento),
            ["caixa"] => Some(Route::Caixa),
            ["cadastro", "convenios"] => Some(Route::CadastroConvenios),
            ["cadastro", "convenios", target] => Some(Route::CadastroConvenio {
                target: RecordTarget::parse(target),
                edit,
            }),
            ["cadastro", "pacientes"] => Some(Route::CadastroPacientes),
            ["cadastro", "pacientes", target] => Some(Route::CadastroPaciente {
                target: RecordTarget::parse(target),
                edit,
            }),
            ["laboratorio", "amostras"] => Some(Route::LaboratorioAmostras),
            ["laboratorio", "lotes"] => Some(Route::LaboratorioLotes),
            ["faturamento"] => Some(Route::Faturamento),
            ["seguranca"] => Some(Route::Seguranca),
            _ => None,
        }
    }

    /// Render the route back to its path (with query when edit is set).
    pub fn path(&self) -> String {
        match self {
            Route::Atendimento => "/atendimento".to_string(),
            Route::Caixa => "/caixa".to_string(),
            Route::CadastroConvenios => "/cadastro/convenios".to_string(),
            Route::CadastroConvenio { target, edit } => {
                detail_path("/cadastro/convenios", target, *edit)
            }
            Route::CadastroPacientes => "/cadastro/pacientes".to_string(),
            Route::CadastroPaciente { target, edit } => {
                detail_path("/cadastro/pacientes", target, *edit)
            }
            Route::LaboratorioAmostras => "/laboratorio/amostras".to_string(),
            Route::LaboratorioLotes => "/laboratorio/lotes".to_string(),
            Route::Faturamento => "/faturamento".to_string(),
            Route::Seguranca => "/seguranca".to_string(),
        }
    }
}

fn detail_path(prefix: &str, target: &RecordTarget, edit: bool) -> String {
    let mut path = format!("{}/{}", prefix, target.segment());
    if edit {
        path.push_str("?edit=true");
    }
    path
}

fn has_edit_flag(query: &str) -> bool {
    query.split('&').any(|pair| pair == "edit=true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_roots() {
        assert_eq!(Route::parse("/atendimento"), Some(Route::Atendimento));
        assert_eq!(Route::parse("/caixa"), Some(Route::Caixa));
        assert_eq!(
            Route::parse("/laboratorio/amostras"),
            Some(Route::LaboratorioAmostras)
        );
        assert_eq!(Route::parse("/seguranca"), Some(Route::Seguranca));
    }

    #[test]
    fn test_novo_means_create() {
        assert_eq!(
            Route::parse("/cadastro/convenios/novo"),
            Some(Route::CadastroConvenio {
                target: RecordTarget::New,
                edit: false,
            })
        );
    }

    #[test]
    fn test_detail_with_edit_flag() {
        assert_eq!(
            Route::parse("/cadastro/convenios/42?edit=true"),
            Some(Route::CadastroConvenio {
                target: RecordTarget::Id("42".into()),
                edit: true,
            })
        );
        // Anything but the exact flag means view mode
        assert_eq!(
            Route::parse("/cadastro/convenios/42?edit=false"),
            Some(Route::CadastroConvenio {
                target: RecordTarget::Id("42".into()),
                edit: false,
            })
        );
    }

    #[test]
    fn test_unknown_paths_rejected() {
        assert_eq!(Route::parse("/"), None);
        assert_eq!(Route::parse("/financeiro"), None);
        assert_eq!(Route::parse("/cadastro"), None);
        assert_eq!(Route::parse("/cadastro/convenios/1/2"), None);
    }

    #[test]
    fn test_path_roundtrip() {
        let routes = [
            Route::Atendimento,
            Route::CadastroConvenios,
            Route::CadastroConvenio {
                target: RecordTarget::Id("abc".into()),
                edit: true,
            },
            Route::CadastroPaciente {
                target: RecordTarget::New,
                edit: false,
            },
            Route::LaboratorioLotes,
            Route::Faturamento,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }
}
