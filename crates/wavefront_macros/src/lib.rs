use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, Pat, Type};

/// Time a function when the `perf_stats` feature of the calling crate is enabled.
///
/// The generated guard logs the elapsed time when the function returns and the
/// duration exceeded the threshold (milliseconds, default 1). Systems that take a
/// `tick: Res<SimTick>` parameter additionally log every 100 ticks regardless
/// of duration so long runs keep a steady baseline in the log file.
///
/// Without `perf_stats` the attribute leaves the function body untouched.
///
/// ```ignore
/// #[profile(4)]
/// pub fn recompute_flow_field(mut grid: ResMut<FlowGrid>, tick: Res<SimTick>) {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        attr.to_string().trim().parse().unwrap_or(1)
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let tick_ident = sig.inputs.iter().find_map(|arg| {
        let FnArg::Typed(pat_type) = arg else {
            return None;
        };
        let Pat::Ident(pat_ident) = &*pat_type.pat else {
            return None;
        };
        if pat_ident.ident != "tick" {
            return None;
        }
        let ty: &Type = &pat_type.ty;
        let type_str = quote!(#ty).to_string();
        type_str.contains("SimTick").then(|| pat_ident.ident.clone())
    });

    let guard = match tick_ident {
        Some(tick) => quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
                tick: u64,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_millis() > #threshold_ms || self.tick % 100 == 0 {
                        bevy::prelude::info!(
                            "[PERF] {} took {:?} (tick {})",
                            self.name,
                            elapsed,
                            self.tick
                        );
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
                tick: #tick.0,
            }
        },
        None => quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_millis() > #threshold_ms {
                        bevy::prelude::info!("[PERF] {} took {:?}", self.name, elapsed);
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
            }
        },
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_guard = {
                #guard
            };

            #block
        }
    };

    output.into()
}
