use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    meta::ParseNestedMeta,
    Data,
    DeriveInput,
    Expr,
    Fields,
    Ident,
    Result,
};

/// The tags of the `error` attribute.
#[derive(Debug, Default)]
struct Tags {
    message: Option<Expr>,
    labels: Option<Expr>,
    help: Option<Expr>,
}

impl Tags {
    /// Reads one `tag = expr` pair of the attribute.
    fn read(&mut self, meta: ParseNestedMeta) -> Result<()> {
        let slot = if meta.path.is_ident("message") {
            &mut self.message
        } else if meta.path.is_ident("labels") {
            &mut self.labels
        } else if meta.path.is_ident("help") {
            &mut self.help
        } else {
            return Err(meta.error("expected one of `message`, `labels` or `help`"));
        };

        if slot.is_some() {
            return Err(meta.error("this tag is given more than once"));
        }
        *slot = Some(meta.value()?.parse()?);
        Ok(())
    }
}

/// A struct that `ErrorKind` is derived for.
pub struct ErrorKindTarget {
    name: Ident,

    /// The names of the fields, or [`None`] for a unit struct.
    fields: Option<Vec<Ident>>,

    tags: Tags,
}

impl ErrorKindTarget {
    /// Reads the struct and its `error` attribute.
    pub fn new(input: DeriveInput) -> Result<Self> {
        let Data::Struct(data) = input.data else {
            return Err(syn::Error::new_spanned(&input.ident, "`ErrorKind` can only be derived for structs"));
        };

        let fields = match data.fields {
            Fields::Named(named) => Some(named.named.into_iter().filter_map(|field| field.ident).collect()),
            Fields::Unit => None,
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new_spanned(unnamed, "`ErrorKind` cannot be derived for tuple structs"));
            },
        };

        let mut tags = Tags::default();
        for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("error")) {
            attr.parse_nested_meta(|meta| tags.read(meta))?;
        }

        if tags.message.is_none() {
            return Err(syn::Error::new_spanned(&input.ident, "missing `message` tag in `error` attribute"));
        }

        Ok(Self { name: input.ident, fields, tags })
    }

    /// Brings the fields of `self` into scope by name, so that tags can refer to them.
    fn bind_fields(&self) -> TokenStream2 {
        let name = &self.name;
        match &self.fields {
            Some(fields) => quote! {
                #[allow(unused_variables)]
                let #name { #(#fields),* } = self;
            },
            None => quote! {},
        }
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let name = &self.name;
        let bind = self.bind_fields();
        let message = &self.tags.message;
        let labels = self.tags.labels
            .as_ref()
            .map_or_else(|| quote! { [""] }, |labels| quote! { #labels });
        let help = self.tags.help
            .as_ref()
            .map(|help| quote! { report.set_help(#help); });

        tokens.extend(quote! {
            impl symat_error::ErrorKind for #name {
                fn as_any(&self) -> &dyn std::any::Any {
                    self
                }

                fn message(&self) -> String {
                    #bind
                    (#message).to_string()
                }

                fn build_report<'a>(
                    &self,
                    src_id: &'a str,
                    spans: &[std::ops::Range<usize>],
                ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                    #bind

                    let labels = (#labels)
                        .into_iter()
                        .zip(spans)
                        .map(|(text, span)| {
                            let text = text.to_string();
                            let label = ariadne::Label::new((src_id, span.clone()))
                                .with_color(symat_error::EXPR);
                            if text.is_empty() {
                                label
                            } else {
                                label.with_message(text)
                            }
                        })
                        .collect::<Vec<_>>();

                    let offset = spans.first().map_or(0, |span| span.start);
                    #[allow(unused_mut)]
                    let mut report = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                        .with_message(self.message())
                        .with_labels(labels);
                    #help
                    report.finish()
                }
            }
        });
    }
}
