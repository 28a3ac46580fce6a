use std::fmt;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    NumberLiteral(f64),
    StringLiteral(String),
    Identifier(String),
    BinaryOp {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    Call {
        callee: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    VarDeclaration {
        name: String,
        initializer: Option<Expression>,
    },
    FunctionDefinition {
        name: String,
        params: Vec<String>,
        body: Vec<Statement>,
    },
    Write(Expression),
    Import {
        lib_name: String,
        alias: Option<String>,
    },
    Expression(Expression),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Program { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Pre-order traversal seam shared by the printer and the checker.
pub trait AstVisitor<T> {
    type Error;

    fn visit_program(&mut self, statements: &[Statement]) -> Result<T, Self::Error>;
    fn visit_var_declaration(&mut self, name: &str, initializer: Option<&Expression>) -> Result<T, Self::Error>;
    fn visit_function_definition(&mut self, name: &str, params: &[String], body: &[Statement]) -> Result<T, Self::Error>;
    fn visit_write(&mut self, expression: &Expression) -> Result<T, Self::Error>;
    fn visit_import(&mut self, lib_name: &str, alias: Option<&str>) -> Result<T, Self::Error>;
    fn visit_expression_statement(&mut self, expression: &Expression) -> Result<T, Self::Error>;
    fn visit_number_literal(&mut self, value: f64) -> Result<T, Self::Error>;
    fn visit_string_literal(&mut self, value: &str) -> Result<T, Self::Error>;
    fn visit_identifier(&mut self, name: &str) -> Result<T, Self::Error>;
    fn visit_binary_op(&mut self, left: &Expression, operator: BinaryOperator, right: &Expression) -> Result<T, Self::Error>;
    fn visit_call(&mut self, callee: &str, args: &[Expression]) -> Result<T, Self::Error>;
}

impl Program {
    pub fn accept<T, V: AstVisitor<T>>(&self, visitor: &mut V) -> Result<T, V::Error> {
        visitor.visit_program(&self.statements)
    }
}

impl Statement {
    pub fn accept<T, V: AstVisitor<T>>(&self, visitor: &mut V) -> Result<T, V::Error> {
        match self {
            Statement::VarDeclaration { name, initializer } =>
                visitor.visit_var_declaration(name, initializer.as_ref()),
            Statement::FunctionDefinition { name, params, body } =>
                visitor.visit_function_definition(name, params, body),
            Statement::Write(expression) => visitor.visit_write(expression),
            Statement::Import { lib_name, alias } => visitor.visit_import(lib_name, alias.as_deref()),
            Statement::Expression(expression) => visitor.visit_expression_statement(expression),
        }
    }
}

impl Expression {
    pub fn accept<T, V: AstVisitor<T>>(&self, visitor: &mut V) -> Result<T, V::Error> {
        match self {
            Expression::NumberLiteral(value) => visitor.visit_number_literal(*value),
            Expression::StringLiteral(value) => visitor.visit_string_literal(value),
            Expression::Identifier(name) => visitor.visit_identifier(name),
            Expression::BinaryOp { left, operator, right } => visitor.visit_binary_op(left, *operator, right),
            Expression::Call { callee, args } => visitor.visit_call(callee, args),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::NumberLiteral(value) => write!(f, "{}", value),
            Expression::StringLiteral(value) => write!(f, "\"{}\"", value),
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::BinaryOp { left, operator, right } => {
                write!(f, "({} {} {})", left, operator, right)
            }
            Expression::Call { callee, args } => {
                let args_str: Vec<String> = args.iter().map(|arg| format!("{}", arg)).collect();
                write!(f, "{}({})", callee, args_str.join(", "))
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::VarDeclaration { name, initializer } => match initializer {
                Some(value) => write!(f, "let {} = {};", name, value),
                None => write!(f, "let {};", name),
            },
            Statement::FunctionDefinition { name, params, body } => {
                write!(f, "def {}({}) {{", name, params.join(", "))?;
                for stmt in body {
                    write!(f, " {}", stmt)?;
                }
                write!(f, " }}")
            }
            Statement::Write(expression) => write!(f, "write {};", expression),
            // No surface syntax exists for an alias yet.
            Statement::Import { lib_name, .. } => write!(f, ":{}:;", lib_name),
            Statement::Expression(expression) => write!(f, "{};", expression),
        }
    }
}
