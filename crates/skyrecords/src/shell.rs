//! Interactive menu for operators.
//!
//! The shell reads free-text answers line by line and calls into
//! [`RecordStore`]. Record-level failures are reported with a short message
//! and the menu comes back; only a broken output stream ends the loop with an
//! error. End of input ends the loop cleanly.

use std::io::{BufRead, Write};

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::store::RecordStore;

const BANNER: &str = "\
====================================
 SKY v2.0 - Gestion de Clientes
====================================
1) Registrar cliente NUEVO
2) Cliente RECURRENTE (agregar servicio)
3) Ver expediente de un cliente
4) Listar clientes
5) Buscar cliente por nombre
6) Salir
";

/// A menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    /// Register a new client.
    Create,
    /// Add a service to a returning client.
    Append,
    /// Show a client's record.
    View,
    /// List all clients.
    List,
    /// Look up a client by name.
    Search,
    /// Leave the program.
    Exit,
}

impl MenuOption {
    /// Parse the operator's answer to the menu prompt.
    #[must_use]
    pub fn parse(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Create),
            "2" => Some(Self::Append),
            "3" => Some(Self::View),
            "4" => Some(Self::List),
            "5" => Some(Self::Search),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Whether the menu loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The interactive menu loop over a record store.
#[derive(Debug)]
pub struct Shell<'a, R, W> {
    store: &'a RecordStore,
    input: R,
    output: W,
    pause_after_action: bool,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    /// Create a shell reading answers from `input` and writing to `output`.
    pub fn new(store: &'a RecordStore, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
            pause_after_action: true,
        }
    }

    /// Set whether to wait for ENTER after each action.
    #[must_use]
    pub fn pause_after_action(mut self, pause: bool) -> Self {
        self.pause_after_action = pause;
        self
    }

    /// Consume the shell and return its output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu until the operator exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.output.write_all(BANNER.as_bytes())?;
            writeln!(self.output)?;

            let Some(choice) = self.ask("Selecciona una opcion: ")? else {
                break;
            };

            let flow = match MenuOption::parse(&choice) {
                Some(MenuOption::Exit) => {
                    writeln!(self.output, "Saliendo del sistema...")?;
                    break;
                }
                Some(option) => {
                    debug!(?option, "Menu option selected");
                    match self.dispatch(option) {
                        Ok(flow) => flow,
                        Err(err) => {
                            self.report(&err)?;
                            Flow::Continue
                        }
                    }
                }
                None => {
                    writeln!(self.output, "Opcion no válida.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit || self.pause()? == Flow::Quit {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, option: MenuOption) -> Result<Flow> {
        match option {
            MenuOption::Create => self.create_client(),
            MenuOption::Append => self.add_service(),
            MenuOption::View => self.view_client(),
            MenuOption::List => self.list_clients(),
            MenuOption::Search => self.find_client(),
            MenuOption::Exit => Ok(Flow::Quit),
        }
    }

    fn create_client(&mut self) -> Result<Flow> {
        let Some(name) = self.ask_name("Nombre del cliente (persona/negocio): ")? else {
            return Ok(Flow::Quit);
        };

        // Existing clients are turned away before the remaining prompts.
        if self.store.exists(&name)? {
            writeln!(self.output, "El cliente ya existe.")?;
            return Ok(Flow::Continue);
        }

        let Some(contact) = self.ask("Contacto (telefono/correo opcional): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(service) = self.ask("Servicio solicitado (telefonia/internet/tv de paga): ")?
        else {
            return Ok(Flow::Quit);
        };
        let Some(description) = self.ask("Descripción del servicio: ")? else {
            return Ok(Flow::Quit);
        };

        self.store
            .create_record(&name, Some(&contact), &service, &description)?;
        writeln!(self.output, "Cliente creado correctamente.")?;
        Ok(Flow::Continue)
    }

    fn add_service(&mut self) -> Result<Flow> {
        let Some(name) = self.ask_name("Nombre del cliente: ")? else {
            return Ok(Flow::Quit);
        };

        if !self.store.exists(&name)? {
            return Err(Error::not_found(crate::record::normalize_name(&name)));
        }

        let Some(service) = self.ask("Nuevo servicio (telefonía/internet/tv de paga): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(description) = self.ask("Descripcion del nuevo servicio: ")? else {
            return Ok(Flow::Quit);
        };

        self.store.append_entry(&name, &service, &description)?;
        writeln!(self.output, "Solicitud agregada correctamente.")?;
        Ok(Flow::Continue)
    }

    fn view_client(&mut self) -> Result<Flow> {
        let Some(name) = self.ask_name("Nombre del cliente: ")? else {
            return Ok(Flow::Quit);
        };

        let text = self.store.read_record(&name)?;
        writeln!(self.output, "\n=== Expediente del Cliente ===")?;
        writeln!(self.output, "{text}")?;
        Ok(Flow::Continue)
    }

    fn list_clients(&mut self) -> Result<Flow> {
        let mut records = self.store.list_records()?.peekable();
        if records.peek().is_none() {
            writeln!(self.output, "No hay clientes registrados.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "=== Lista de clientes ===")?;
        for key in records {
            writeln!(self.output, "- {}", key?.file_name())?;
        }
        Ok(Flow::Continue)
    }

    fn find_client(&mut self) -> Result<Flow> {
        let Some(name) = self.ask_name("Nombre del cliente a buscar: ")? else {
            return Ok(Flow::Quit);
        };

        if self.store.exists(&name)? {
            writeln!(self.output, "Cliente encontrado.")?;
        } else {
            writeln!(self.output, "Cliente no encontrado.")?;
        }
        Ok(Flow::Continue)
    }

    fn report(&mut self, err: &Error) -> Result<()> {
        match err {
            Error::InvalidName { .. } => writeln!(self.output, "Nombre invalido.")?,
            Error::AlreadyExists { .. } => writeln!(self.output, "El cliente ya existe.")?,
            Error::NotFound { .. } => writeln!(self.output, "El cliente no existe.")?,
            other => {
                error!("Operation failed: {other}");
                writeln!(self.output, "No se pudo completar la operacion: {other}")?;
            }
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<Flow> {
        if !self.pause_after_action {
            writeln!(self.output)?;
            return Ok(Flow::Continue);
        }
        match self.ask("\nPresiona ENTER para continuar...")? {
            Some(_) => {
                writeln!(self.output, "\n\n")?;
                Ok(Flow::Continue)
            }
            None => Ok(Flow::Quit),
        }
    }

    /// Prompt for a client name, rejecting one that is blank.
    fn ask_name(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.ask(prompt)? {
            Some(name) if name.is_empty() => Err(Error::invalid_name(name)),
            answer => Ok(answer),
        }
    }

    /// Print a prompt and read one trimmed line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, RecordStore) {
        crate::logging::init_test_logging();
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = RecordStore::open(dir.path().join("clientes")).expect("failed to open store");
        (dir, store)
    }

    fn run_session(store: &RecordStore, input: &str) -> String {
        let mut shell = Shell::new(store, Cursor::new(input.as_bytes()), Vec::new())
            .pause_after_action(false);
        shell.run().expect("shell failed");
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn test_menu_option_parse() {
        assert_eq!(MenuOption::parse("1"), Some(MenuOption::Create));
        assert_eq!(MenuOption::parse(" 4 "), Some(MenuOption::List));
        assert_eq!(MenuOption::parse("6"), Some(MenuOption::Exit));
        assert_eq!(MenuOption::parse("7"), None);
        assert_eq!(MenuOption::parse("uno"), None);
    }

    #[test]
    fn test_exit_option() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "6\n");
        assert!(out.contains("SKY v2.0 - Gestion de Clientes"));
        assert!(out.contains("Saliendo del sistema..."));
    }

    #[test]
    fn test_end_of_input_ends_loop() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "");
        assert!(out.contains("Selecciona una opcion: "));
        assert!(!out.contains("Saliendo"));
    }

    #[test]
    fn test_invalid_option() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "9\n6\n");
        assert!(out.contains("Opcion no válida."));
        assert!(out.contains("Saliendo del sistema..."));
    }

    #[test]
    fn test_create_client() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "1\nJuan Perez\n555-1234\ninternet\nalta nueva\n6\n");

        assert!(out.contains("Descripción del servicio: "));
        assert!(out.contains("Cliente creado correctamente."));
        let text = fs::read_to_string(store.root().join("Juan_Perez.txt")).unwrap();
        assert!(text.contains("Contacto: 555-1234\n"));
        assert!(text.contains("] internet | alta nueva\n"));
    }

    #[test]
    fn test_create_without_contact() {
        let (_dir, store) = create_test_store();
        run_session(&store, "1\nAna\n\ntv de paga\nbasico\n6\n");

        let text = store.read_record("Ana").unwrap();
        assert!(text.contains("Contacto: N/A\n"));
    }

    #[test]
    fn test_create_existing_client_stops_early() {
        let (_dir, store) = create_test_store();
        store.create_record("Ana", None, "internet", "alta").unwrap();

        // The next line after the name is read as a menu choice, not a contact.
        let out = run_session(&store, "1\nAna\n6\n");
        assert!(out.contains("El cliente ya existe."));
        assert!(!out.contains("Contacto (telefono/correo opcional)"));
        assert!(out.contains("Saliendo del sistema..."));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "1\n   \n6\n");
        assert!(out.contains("Nombre invalido."));
        assert_eq!(store.list_records().unwrap().count(), 0);
    }

    #[test]
    fn test_name_without_usable_characters_is_rejected() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "5\n#$%\n6\n");
        assert!(out.contains("Nombre invalido."));
    }

    #[test]
    fn test_add_service() {
        let (_dir, store) = create_test_store();
        store.create_record("Luis", None, "internet", "alta").unwrap();

        let out = run_session(&store, "2\nLuis\ntv de paga\nupgrade\n6\n");
        assert!(out.contains("Nuevo servicio (telefonía/internet/tv de paga): "));
        assert!(out.contains("Solicitud agregada correctamente."));

        let record = store.load_record("Luis").unwrap();
        assert_eq!(record.entries.len(), 2);
        assert_eq!(record.entries[1].service, "tv de paga");
    }

    #[test]
    fn test_add_service_missing_client() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "2\nNadie\n6\n");
        assert!(out.contains("El cliente no existe."));
        assert!(!store.exists("Nadie").unwrap());
    }

    #[test]
    fn test_view_client() {
        let (_dir, store) = create_test_store();
        store
            .create_record("Juan Perez", Some("555"), "internet", "alta")
            .unwrap();

        let out = run_session(&store, "3\nJuan Perez\n6\n");
        assert!(out.contains("=== Expediente del Cliente ==="));
        assert!(out.contains("Cliente: Juan Perez"));
    }

    #[test]
    fn test_view_missing_client() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "3\nNadie\n6\n");
        assert!(out.contains("El cliente no existe."));
    }

    #[test]
    fn test_list_clients() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "4\n6\n");
        assert!(out.contains("No hay clientes registrados."));

        store.create_record("Ana", None, "internet", "alta").unwrap();
        store.create_record("Luis", None, "internet", "alta").unwrap();
        let out = run_session(&store, "4\n6\n");
        assert!(out.contains("=== Lista de clientes ==="));
        assert!(out.contains("- Ana.txt\n"));
        assert!(out.contains("- Luis.txt\n"));
    }

    #[test]
    fn test_find_client() {
        let (_dir, store) = create_test_store();
        store.create_record("Ana", None, "internet", "alta").unwrap();

        let out = run_session(&store, "5\n  Ana \n5\nNadie\n6\n");
        assert!(out.contains("Cliente encontrado."));
        assert!(out.contains("Cliente no encontrado."));
    }

    #[test]
    fn test_pause_waits_for_enter() {
        let (_dir, store) = create_test_store();
        let mut shell = Shell::new(&store, Cursor::new(&b"4\n\n6\n"[..]), Vec::new());
        shell.run().unwrap();
        let out = String::from_utf8(shell.into_output()).unwrap();

        assert!(out.contains("Presiona ENTER para continuar..."));
        assert!(out.contains("Saliendo del sistema..."));
    }

    #[test]
    fn test_input_ending_mid_action() {
        let (_dir, store) = create_test_store();
        let out = run_session(&store, "1\nJuan Perez\n555\n");
        assert!(!out.contains("Cliente creado"));
        assert!(!store.exists("Juan Perez").unwrap());
    }
}
