mod app;
mod dom;
mod fullcalendar;
mod globals;
mod host;
mod listeners;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting rally frontend"
  );

  app::boot();
}
