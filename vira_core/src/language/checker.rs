use std::collections::HashSet;
use std::convert::Infallible;
use log::debug;
use crate::language::ast::{AstVisitor, BinaryOperator, Expression, Program, Statement};
use crate::language::error::Error;
use crate::semantic_error;

/// Symbol checker run after a successful parse.
///
/// Reports one error per offending construct: an identifier used before any
/// `let`, parameter or `def` introduced it, and a parameter name repeated in
/// one definition. Callees are not resolved since they may come from an
/// imported library. The AST carries no positions, so errors have no line.
#[derive(Default)]
pub struct Checker {
    scopes: Vec<HashSet<String>>,
    current_function: Option<String>,
    errors: Vec<Error>,
}

impl Checker {
    pub fn new() -> Self {
        Checker::default()
    }

    pub fn check(mut self, program: &Program) -> Vec<Error> {
        let Ok(()) = program.accept::<(), _>(&mut self);
        debug!("Semantic check finished with {} errors", self.errors.len());
        self.errors
    }

    fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn is_declared(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }

    fn context(&self) -> String {
        match &self.current_function {
            Some(name) => format!(" in function '{}'", name),
            None => String::new(),
        }
    }
}

impl AstVisitor<()> for Checker {
    type Error = Infallible;

    fn visit_program(&mut self, statements: &[Statement]) -> Result<(), Infallible> {
        self.scopes.push(HashSet::new());
        for stmt in statements {
            stmt.accept::<(), _>(self)?;
        }
        self.scopes.pop();
        Ok(())
    }

    fn visit_var_declaration(&mut self, name: &str, initializer: Option<&Expression>) -> Result<(), Infallible> {
        if let Some(expr) = initializer {
            expr.accept::<(), _>(self)?;
        }
        self.declare(name);
        Ok(())
    }

    fn visit_function_definition(&mut self, name: &str, params: &[String], body: &[Statement]) -> Result<(), Infallible> {
        self.declare(name);

        let mut scope = HashSet::new();
        for param in params {
            if !scope.insert(param.clone()) {
                self.errors.push(semantic_error!(
                    format!("Duplicate parameter '{}' in function '{}'", param, name),
                    None
                ));
            }
        }

        let enclosing = self.current_function.replace(name.to_string());
        self.scopes.push(scope);
        for stmt in body {
            stmt.accept::<(), _>(self)?;
        }
        self.scopes.pop();
        self.current_function = enclosing;

        Ok(())
    }

    fn visit_write(&mut self, expression: &Expression) -> Result<(), Infallible> {
        expression.accept(self)
    }

    fn visit_import(&mut self, _lib_name: &str, _alias: Option<&str>) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_expression_statement(&mut self, expression: &Expression) -> Result<(), Infallible> {
        expression.accept(self)
    }

    fn visit_number_literal(&mut self, _value: f64) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_string_literal(&mut self, _value: &str) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_identifier(&mut self, name: &str) -> Result<(), Infallible> {
        if !self.is_declared(name) {
            let context = self.context();
            self.errors.push(semantic_error!(
                format!("Undefined identifier '{}'{}", name, context),
                None
            ));
        }
        Ok(())
    }

    fn visit_binary_op(&mut self, left: &Expression, _operator: BinaryOperator, right: &Expression) -> Result<(), Infallible> {
        left.accept::<(), _>(self)?;
        right.accept(self)
    }

    fn visit_call(&mut self, _callee: &str, args: &[Expression]) -> Result<(), Infallible> {
        for arg in args {
            arg.accept::<(), _>(self)?;
        }
        Ok(())
    }
}

/// Checks `program` and returns every semantic error found.
pub fn check(program: &Program) -> Vec<Error> {
    Checker::new().check(program)
}
